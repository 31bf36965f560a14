//! Seller search rules: sort direction, pagination and substring patterns.
//!
//! The SQL itself is assembled in the repository layer; this module holds the
//! pieces that can be validated and tested without a database.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default page size for the seller list.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Maximum page size for the seller list.
pub const MAX_PER_PAGE: i64 = 100;

/// Ordering of results by seller id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword. Only ever produced from the enum, never from user text.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(CoreError::Validation(format!(
                "order must be ASC or DESC, got '{other}'"
            ))),
        }
    }
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    per_page: i64,
}

impl Pagination {
    /// `page` must be at least 1 and `per_page` within `1..=MAX_PER_PAGE`.
    pub fn new(page: i64, per_page: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if per_page < 1 {
            return Err(CoreError::Validation(format!(
                "per_page must be positive, got {per_page}"
            )));
        }
        if per_page > MAX_PER_PAGE {
            return Err(CoreError::Validation(format!(
                "per_page must be at most {MAX_PER_PAGE}, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn page(self) -> i64 {
        self.page
    }

    pub fn per_page(self) -> i64 {
        self.per_page
    }

    /// Row offset: `(page - 1) * per_page`.
    pub fn offset(self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Number of pages needed to cover `total` rows.
    pub fn page_count(self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Inclusive range of registration dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build from the optional pair of query parameters. Both or neither.
    pub fn from_parts(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, CoreError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(CoreError::Validation(
                "start_date and end_date must be given together".into(),
            )),
        }
    }

    pub fn start(self) -> NaiveDate {
        self.start
    }

    pub fn end(self) -> NaiveDate {
        self.end
    }

    /// Half-open UTC bounds `[start 00:00, day after end 00:00)`.
    pub fn bounds(self) -> (Timestamp, Timestamp) {
        let lower = self.start.and_time(NaiveTime::MIN).and_utc();
        let upper = self
            .end
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc();
        (lower, upper)
    }
}

/// Build a `LIKE` pattern matching `needle` anywhere, escaping wildcards.
pub fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Treat blank query parameters as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sort_direction_parses_case_insensitively() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }

    #[test]
    fn offset_is_page_minus_one_times_per_page() {
        assert_eq!(Pagination::new(1, 10).unwrap().offset(), 0);
        assert_eq!(Pagination::new(3, 25).unwrap().offset(), 50);
    }

    #[test]
    fn pagination_rejects_non_positive_values() {
        assert_matches!(Pagination::new(0, 10), Err(CoreError::Validation(_)));
        assert_matches!(Pagination::new(1, 0), Err(CoreError::Validation(_)));
        assert_matches!(Pagination::new(1, -5), Err(CoreError::Validation(_)));
        assert_matches!(
            Pagination::new(1, MAX_PER_PAGE + 1),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn page_count_covers_all_rows() {
        let p = Pagination::new(1, 10).unwrap();
        assert_eq!(p.page_count(0), 0);
        assert_eq!(p.page_count(10), 1);
        assert_eq!(p.page_count(11), 2);
    }

    #[test]
    fn date_range_requires_ordered_bounds() {
        assert!(DateRange::new(date(2020, 10, 2), date(2020, 10, 1)).is_err());
        assert!(DateRange::new(date(2020, 10, 1), date(2020, 10, 1)).is_ok());
    }

    #[test]
    fn date_range_from_parts_needs_both_or_neither() {
        assert_eq!(DateRange::from_parts(None, None).unwrap(), None);
        assert!(DateRange::from_parts(Some(date(2020, 1, 1)), None).is_err());
        assert!(DateRange::from_parts(None, Some(date(2020, 1, 1))).is_err());
    }

    #[test]
    fn date_range_bounds_include_whole_end_day() {
        let range = DateRange::new(date(2020, 10, 1), date(2020, 10, 3)).unwrap();
        let (lower, upper) = range.bounds();
        assert_eq!(lower, Utc.with_ymd_and_hms(2020, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(upper, Utc.with_ymd_and_hms(2020, 10, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("shop"), "%shop%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn non_blank_drops_empty_values() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" kim ".into())), Some("kim".into()));
    }
}
