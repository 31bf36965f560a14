//! Seller operations composed from the repositories.
//!
//! Mutations take `&mut PgConnection` and never commit: the caller owns the
//! transaction and commits only when the whole operation succeeded. Reads
//! take the pool and never lock.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use sellerdesk_core::error::CoreError;
use sellerdesk_core::search::{contains_pattern, Pagination, SortDirection};
use sellerdesk_core::seller::{
    clamp_lookup_limit, validate_account, validate_distinct_manager_phones, validate_email,
    validate_english_name, validate_korean_name, validate_manager_count, validate_phone,
};
use sellerdesk_core::status::{SellerProperty, SellerStatus, StatusId, INITIAL_SELLER_STATUS};
use sellerdesk_core::types::DbId;

use crate::begin_consistent_read;
use crate::error::StoreResult;
use crate::models::manager_contact::NewManagerContact;
use crate::models::search::{SellerSearchCriteria, SellerSearchPage, SellerSearchRow};
use crate::models::seller::{NewSeller, SellerCredentials, SellerLookup, SellerProfile};
use crate::models::snapshot::{SellerAttributes, SellerChangeSet, SellerSnapshot};
use crate::models::status_history::StatusChangeRecord;
use crate::repositories::{
    IdentifierIntents, ManagerContactRepo, SellerRepo, SellerSearchRepo, SellerSnapshotRepo,
    StatusHistoryRepo, UniquenessRepo,
};

/// Entry point for seller onboarding, revision, display and search.
pub struct SellerWorkflow;

impl SellerWorkflow {
    /// Register a seller: identity row, first snapshot and manager contacts.
    ///
    /// Fails with `UniquenessConflict` before anything is written when an
    /// identifier is already claimed.
    pub async fn sign_up(
        conn: &mut PgConnection,
        new_seller: &NewSeller,
        actor_id: Option<DbId>,
    ) -> StoreResult<DbId> {
        validate_new_seller(new_seller)?;
        UniquenessRepo::ensure_available(&mut *conn, &IdentifierIntents::for_signup(new_seller))
            .await?;

        let now = Utc::now();
        let seller = SellerRepo::insert(&mut *conn, now).await?;
        let attributes = SellerAttributes::initial(
            INITIAL_SELLER_STATUS.id(),
            new_seller.property_id,
            new_seller.account.clone(),
            new_seller.password_hash.clone(),
            new_seller.korean_name.clone(),
            new_seller.english_name.clone(),
            new_seller.cs_phone.clone(),
        );
        SellerSnapshotRepo::create_initial(&mut *conn, seller.id, &attributes, actor_id, now)
            .await?;
        ManagerContactRepo::insert_all(&mut *conn, seller.id, &new_seller.managers, now).await?;

        Ok(seller.id)
    }

    /// Revise a seller's profile and return the new active snapshot.
    ///
    /// Only identifiers that actually change are checked for uniqueness.
    pub async fn revise_profile(
        conn: &mut PgConnection,
        seller_id: DbId,
        changes: &SellerChangeSet,
        actor_id: DbId,
    ) -> StoreResult<SellerSnapshot> {
        validate_change_set(changes)?;

        let current = SellerSnapshotRepo::get_active_for_update(&mut *conn, seller_id).await?;
        validate_opening_hours(&changes.apply_to(&current.attributes))?;
        let current_managers = ManagerContactRepo::list_for_seller(&mut *conn, seller_id).await?;
        let intents =
            IdentifierIntents::for_revision(changes, &current.attributes, &current_managers);
        UniquenessRepo::ensure_available(&mut *conn, &intents).await?;

        SellerSnapshotRepo::revise(conn, seller_id, changes, actor_id).await
    }

    /// The active snapshot of a seller with its manager contacts.
    pub async fn fetch_active_profile(pool: &PgPool, seller_id: DbId) -> StoreResult<SellerProfile> {
        let snapshot = SellerSnapshotRepo::get_active(pool, seller_id).await?;
        let managers = ManagerContactRepo::list_for_seller(pool, seller_id).await?;
        Ok(SellerProfile { snapshot, managers })
    }

    /// Status transitions of a seller, newest first.
    pub async fn fetch_history(pool: &PgPool, seller_id: DbId) -> StoreResult<Vec<StatusChangeRecord>> {
        ensure_seller_exists(pool, seller_id).await?;
        Ok(StatusHistoryRepo::list_for(pool, seller_id).await?)
    }

    /// Every stored version of a seller's profile, newest first.
    pub async fn fetch_snapshots(pool: &PgPool, seller_id: DbId) -> StoreResult<Vec<SellerSnapshot>> {
        ensure_seller_exists(pool, seller_id).await?;
        SellerSnapshotRepo::list_for_seller(pool, seller_id).await
    }

    /// One page of the seller list plus the total number of matches.
    ///
    /// Count and page read one snapshot, so `total` describes exactly the
    /// rows the page was cut from.
    pub async fn search(
        pool: &PgPool,
        criteria: &SellerSearchCriteria,
        sort: SortDirection,
        pagination: Pagination,
    ) -> StoreResult<SellerSearchPage> {
        let mut tx = begin_consistent_read(pool).await?;
        let total = SellerSearchRepo::count(&mut *tx, criteria).await?;
        let items = if total == 0 {
            Vec::new()
        } else {
            SellerSearchRepo::page(&mut *tx, criteria, sort, pagination).await?
        };
        tx.commit().await?;
        Ok(SellerSearchPage {
            total,
            page: pagination.page(),
            per_page: pagination.per_page(),
            items,
        })
    }

    /// Every seller matching `criteria`, unpaged.
    pub async fn export(
        pool: &PgPool,
        criteria: &SellerSearchCriteria,
        sort: SortDirection,
    ) -> StoreResult<Vec<SellerSearchRow>> {
        Ok(SellerSearchRepo::export(pool, criteria, sort).await?)
    }

    /// Mark a seller deleted. Snapshots and history are retained.
    pub async fn soft_delete(conn: &mut PgConnection, seller_id: DbId) -> StoreResult<()> {
        if !SellerRepo::soft_delete(conn, seller_id, Utc::now()).await? {
            return Err(CoreError::NotFound {
                entity: "Seller",
                id: seller_id,
            }
            .into());
        }
        Ok(())
    }

    /// Seller picker for product registration: korean name substring match,
    /// at most ten rows.
    pub async fn lookup_by_name(
        pool: &PgPool,
        term: &str,
        limit: Option<i64>,
    ) -> StoreResult<Vec<SellerLookup>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(CoreError::Validation("search term must not be empty".into()).into());
        }
        let limit = clamp_lookup_limit(limit);
        Ok(SellerRepo::lookup_by_name(pool, &contains_pattern(term), limit).await?)
    }

    /// Credentials for sign-in, if `account` belongs to an active seller.
    pub async fn find_credentials(
        pool: &PgPool,
        account: &str,
    ) -> StoreResult<Option<SellerCredentials>> {
        Ok(SellerRepo::find_credentials(pool, account).await?)
    }
}

async fn ensure_seller_exists(pool: &PgPool, seller_id: DbId) -> StoreResult<()> {
    if SellerRepo::find_by_id(pool, seller_id).await?.is_none() {
        return Err(CoreError::NotFound {
            entity: "Seller",
            id: seller_id,
        }
        .into());
    }
    Ok(())
}

fn validate_new_seller(seller: &NewSeller) -> Result<(), CoreError> {
    validate_account(&seller.account)?;
    validate_korean_name(&seller.korean_name)?;
    validate_english_name(&seller.english_name)?;
    validate_phone(&seller.cs_phone, "cs_phone")?;
    validate_property_id(seller.property_id)?;
    validate_managers(&seller.managers)
}

fn validate_change_set(changes: &SellerChangeSet) -> Result<(), CoreError> {
    if let Some(account) = &changes.account {
        validate_account(account)?;
    }
    if let Some(name) = &changes.korean_name {
        validate_korean_name(name)?;
    }
    if let Some(name) = &changes.english_name {
        validate_english_name(name)?;
    }
    if let Some(phone) = &changes.cs_phone {
        validate_phone(phone, "cs_phone")?;
    }
    if let Some(status_id) = changes.status_id {
        if SellerStatus::from_id(status_id).is_none() {
            return Err(CoreError::Validation(format!(
                "unknown seller status id {status_id}"
            )));
        }
    }
    if let Some(property_id) = changes.property_id {
        validate_property_id(property_id)?;
    }
    if let Some(managers) = &changes.managers {
        validate_managers(managers)?;
    }
    Ok(())
}

/// Opening hours are checked on the revised attributes, since a change set
/// may move only one end of the range.
fn validate_opening_hours(attributes: &SellerAttributes) -> Result<(), CoreError> {
    if let (Some(open), Some(close)) = (attributes.open_time, attributes.close_time) {
        if open >= close {
            return Err(CoreError::Validation(format!(
                "open_time {open} must be before close_time {close}"
            )));
        }
    }
    Ok(())
}

fn validate_property_id(property_id: StatusId) -> Result<(), CoreError> {
    if SellerProperty::from_id(property_id).is_none() {
        return Err(CoreError::Validation(format!(
            "unknown seller property id {property_id}"
        )));
    }
    Ok(())
}

fn validate_managers(managers: &[NewManagerContact]) -> Result<(), CoreError> {
    validate_manager_count(managers.len())?;
    for manager in managers {
        validate_phone(&manager.phone_number, "manager_phone")?;
        if let Some(email) = &manager.email {
            validate_email(email)?;
        }
    }
    validate_distinct_manager_phones(managers.iter().map(|m| m.phone_number.as_str()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveTime;

    use super::*;

    fn manager(phone: &str) -> NewManagerContact {
        NewManagerContact {
            name: Some("kim".into()),
            email: None,
            phone_number: phone.into(),
        }
    }

    fn new_seller() -> NewSeller {
        NewSeller {
            account: "shop_one".into(),
            password_hash: "hash".into(),
            korean_name: "가게".into(),
            english_name: "shop".into(),
            cs_phone: "02-111-2222".into(),
            property_id: SellerProperty::Market.id(),
            managers: vec![manager("010-1111-2222")],
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(validate_new_seller(&new_seller()).is_ok());
    }

    #[test]
    fn signup_requires_a_manager() {
        let mut seller = new_seller();
        seller.managers.clear();
        assert_matches!(validate_new_seller(&seller), Err(CoreError::Validation(_)));
    }

    #[test]
    fn signup_rejects_unknown_property() {
        let mut seller = new_seller();
        seller.property_id = 99;
        assert_matches!(validate_new_seller(&seller), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_change_set_is_valid() {
        assert!(validate_change_set(&SellerChangeSet::default()).is_ok());
    }

    #[test]
    fn change_set_rejects_unknown_status() {
        let changes = SellerChangeSet {
            status_id: Some(42),
            ..Default::default()
        };
        assert_matches!(validate_change_set(&changes), Err(CoreError::Validation(_)));
    }

    fn attributes_with_hours(open: Option<NaiveTime>, close: Option<NaiveTime>) -> SellerAttributes {
        let mut attributes = SellerAttributes::initial(
            1,
            SellerProperty::Market.id(),
            "shop_one".into(),
            "hash".into(),
            "가게".into(),
            "shop".into(),
            "02-111-2222".into(),
        );
        attributes.open_time = open;
        attributes.close_time = close;
        attributes
    }

    #[test]
    fn opening_hours_must_be_ordered() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0);
        let six_pm = NaiveTime::from_hms_opt(18, 0, 0);

        assert!(validate_opening_hours(&attributes_with_hours(nine, six_pm)).is_ok());
        assert!(validate_opening_hours(&attributes_with_hours(None, None)).is_ok());
        assert!(validate_opening_hours(&attributes_with_hours(nine, None)).is_ok());
        assert_matches!(
            validate_opening_hours(&attributes_with_hours(six_pm, nine)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_opening_hours(&attributes_with_hours(nine, nine)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn one_sided_change_is_checked_against_previous_hours() {
        let previous = attributes_with_hours(
            NaiveTime::from_hms_opt(9, 0, 0),
            NaiveTime::from_hms_opt(18, 0, 0),
        );
        let changes = SellerChangeSet {
            close_time: NaiveTime::from_hms_opt(8, 0, 0),
            ..Default::default()
        };
        assert!(validate_change_set(&changes).is_ok());
        assert_matches!(
            validate_opening_hours(&changes.apply_to(&previous)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn change_set_rejects_too_many_managers() {
        let changes = SellerChangeSet {
            managers: Some(vec![
                manager("010-1111-0001"),
                manager("010-1111-0002"),
                manager("010-1111-0003"),
                manager("010-1111-0004"),
            ]),
            ..Default::default()
        };
        assert_matches!(validate_change_set(&changes), Err(CoreError::Validation(_)));
    }

    #[test]
    fn change_set_rejects_duplicate_manager_phones() {
        let changes = SellerChangeSet {
            managers: Some(vec![manager("010-1111-0001"), manager("010-1111-0001")]),
            ..Default::default()
        };
        assert_matches!(validate_change_set(&changes), Err(CoreError::Validation(_)));
    }
}
