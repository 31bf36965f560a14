//! Seller input rules shared by signup and profile revision.
//!
//! Every validator returns `CoreError::Validation` naming the offending field.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// A seller always has at least one manager contact and at most three.
pub const MIN_MANAGER_CONTACTS: usize = 1;
pub const MAX_MANAGER_CONTACTS: usize = 3;

/// Minimum plaintext password length accepted at signup and on change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Upper bound for display names (korean and english).
pub const MAX_NAME_LENGTH: usize = 40;

/// Default and maximum row count for the seller picker lookup.
pub const DEFAULT_LOOKUP_LIMIT: i64 = 10;
pub const MAX_LOOKUP_LIMIT: i64 = 10;

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{4,19}$").expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,3}-\d{3,4}-\d{4}$").expect("valid regex"));

static KOREAN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[가-힣A-Za-z0-9 ]+$").expect("valid regex"));

static ENGLISH_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9 ]+$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Account: 5-20 chars, letters/digits/`_`/`-`, starting with a letter or digit.
pub fn validate_account(account: &str) -> Result<(), CoreError> {
    if !ACCOUNT_RE.is_match(account) {
        return Err(CoreError::Validation(
            "account must be 5-20 letters, digits, '_' or '-'".into(),
        ));
    }
    Ok(())
}

/// Phone numbers are stored dashed, e.g. `02-1234-5678` or `010-1234-5678`.
pub fn validate_phone(phone: &str, field: &str) -> Result<(), CoreError> {
    if !PHONE_RE.is_match(phone) {
        return Err(CoreError::Validation(format!(
            "{field} must look like 010-1234-5678"
        )));
    }
    Ok(())
}

pub fn validate_korean_name(name: &str) -> Result<(), CoreError> {
    validate_name(name, "korean_name", &KOREAN_NAME_RE)
}

/// English display names are lowercase.
pub fn validate_english_name(name: &str) -> Result<(), CoreError> {
    validate_name(name, "english_name", &ENGLISH_NAME_RE)
}

fn validate_name(name: &str, field: &str, pattern: &Regex) -> Result<(), CoreError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be 1-{MAX_NAME_LENGTH} characters"
        )));
    }
    if !pattern.is_match(name) {
        return Err(CoreError::Validation(format!(
            "{field} contains unsupported characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation("email is not a valid address".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Manager contact lists are replaced wholesale, so the whole list is checked.
pub fn validate_manager_count(count: usize) -> Result<(), CoreError> {
    if !(MIN_MANAGER_CONTACTS..=MAX_MANAGER_CONTACTS).contains(&count) {
        return Err(CoreError::Validation(format!(
            "between {MIN_MANAGER_CONTACTS} and {MAX_MANAGER_CONTACTS} manager contacts are required, got {count}"
        )));
    }
    Ok(())
}

/// Reject duplicate phone numbers within one submitted contact list.
pub fn validate_distinct_manager_phones<'a>(
    phones: impl IntoIterator<Item = &'a str>,
) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for phone in phones {
        if !seen.insert(phone) {
            return Err(CoreError::Validation(format!(
                "manager phone {phone} is listed more than once"
            )));
        }
    }
    Ok(())
}

/// Clamp the seller picker limit to `1..=MAX_LOOKUP_LIMIT`.
pub fn clamp_lookup_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LOOKUP_LIMIT).clamp(1, MAX_LOOKUP_LIMIT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn account_accepts_typical_values() {
        assert!(validate_account("star_0327").is_ok());
        assert!(validate_account("shop-1").is_ok());
    }

    #[test]
    fn account_rejects_short_long_and_symbols() {
        assert!(validate_account("abcd").is_err());
        assert!(validate_account(&"a".repeat(21)).is_err());
        assert!(validate_account("_leading").is_err());
        assert!(validate_account("has space").is_err());
    }

    #[test]
    fn phone_requires_dashed_format() {
        assert!(validate_phone("02-1342-2222", "cs_phone").is_ok());
        assert!(validate_phone("010-1234-5678", "cs_phone").is_ok());
        assert!(validate_phone("01012345678", "cs_phone").is_err());
    }

    #[test]
    fn phone_error_names_the_field() {
        let err = validate_phone("nope", "manager_phone").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("manager_phone"));
    }

    #[test]
    fn korean_name_allows_hangul() {
        assert!(validate_korean_name("브랜디 샵").is_ok());
        assert!(validate_korean_name("").is_err());
        assert!(validate_korean_name("샵!").is_err());
    }

    #[test]
    fn english_name_is_lowercase_only() {
        assert!(validate_english_name("brandi shop").is_ok());
        assert!(validate_english_name("Brandi").is_err());
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let forty = "가".repeat(MAX_NAME_LENGTH);
        assert!(validate_korean_name(&forty).is_ok());
        assert!(validate_korean_name(&format!("{forty}가")).is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn manager_count_bounds() {
        assert!(validate_manager_count(0).is_err());
        assert!(validate_manager_count(1).is_ok());
        assert!(validate_manager_count(3).is_ok());
        assert!(validate_manager_count(4).is_err());
    }

    #[test]
    fn duplicate_manager_phones_rejected() {
        assert!(validate_distinct_manager_phones(["010-1111-2222", "010-3333-4444"]).is_ok());
        assert!(validate_distinct_manager_phones(["010-1111-2222", "010-1111-2222"]).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("manager@brandi.co.kr").is_ok());
        assert!(validate_email("manager.brandi.co.kr").is_err());
    }

    #[test]
    fn lookup_limit_is_clamped() {
        assert_eq!(clamp_lookup_limit(None), 10);
        assert_eq!(clamp_lookup_limit(Some(50)), 10);
        assert_eq!(clamp_lookup_limit(Some(0)), 1);
        assert_eq!(clamp_lookup_limit(Some(4)), 4);
    }
}
