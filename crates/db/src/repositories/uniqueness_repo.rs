//! Uniqueness checks for seller identifiers.
//!
//! Account and customer-service phone must be unique among the active
//! snapshots of non-deleted sellers. Manager phones are unique across every
//! manager contact ever stored, deleted sellers included.

use sqlx::{PgConnection, PgExecutor};
use sellerdesk_core::error::{CoreError, UniqueField};
use sellerdesk_core::versioning::sentinel_expiry;

use crate::error::StoreResult;
use crate::models::manager_contact::ManagerContact;
use crate::models::seller::NewSeller;
use crate::models::snapshot::{SellerAttributes, SellerChangeSet};

/// Key of the transaction-scoped advisory lock serializing identifier writes.
const IDENTIFIER_LOCK_KEY: i64 = 0x5E11_E2_1D;

/// Identifier values a mutation is about to claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIntents<'a> {
    pub account: Option<&'a str>,
    pub cs_phone: Option<&'a str>,
    pub manager_phones: Vec<&'a str>,
}

impl<'a> IdentifierIntents<'a> {
    /// Everything a new seller claims.
    pub fn for_signup(seller: &'a NewSeller) -> Self {
        Self {
            account: Some(seller.account.as_str()),
            cs_phone: Some(seller.cs_phone.as_str()),
            manager_phones: seller
                .managers
                .iter()
                .map(|m| m.phone_number.as_str())
                .collect(),
        }
    }

    /// Only the values a revision actually changes. A seller keeping its own
    /// account, phone or manager phone does not collide with itself.
    pub fn for_revision(
        changes: &'a SellerChangeSet,
        current: &SellerAttributes,
        current_managers: &[ManagerContact],
    ) -> Self {
        let manager_phones = changes
            .managers
            .iter()
            .flatten()
            .map(|m| m.phone_number.as_str())
            .filter(|phone| !current_managers.iter().any(|c| c.phone_number == *phone))
            .collect();
        Self {
            account: changes
                .account
                .as_deref()
                .filter(|account| *account != current.account),
            cs_phone: changes
                .cs_phone
                .as_deref()
                .filter(|phone| *phone != current.cs_phone),
            manager_phones,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.account.is_none() && self.cs_phone.is_none() && self.manager_phones.is_empty()
    }
}

/// Provides identifier availability checks.
pub struct UniquenessRepo;

impl UniquenessRepo {
    pub async fn is_account_taken<'e>(
        executor: impl PgExecutor<'e>,
        account: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM seller_snapshots ss \
                JOIN sellers s ON s.id = ss.seller_id \
                WHERE ss.account = $1 AND ss.expired_at = $2 AND s.is_deleted = false)",
        )
        .bind(account)
        .bind(sentinel_expiry())
        .fetch_one(executor)
        .await
    }

    pub async fn is_cs_phone_taken<'e>(
        executor: impl PgExecutor<'e>,
        phone: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM seller_snapshots ss \
                JOIN sellers s ON s.id = ss.seller_id \
                WHERE ss.cs_phone = $1 AND ss.expired_at = $2 AND s.is_deleted = false)",
        )
        .bind(phone)
        .bind(sentinel_expiry())
        .fetch_one(executor)
        .await
    }

    /// Global over all manager contacts, regardless of seller deletion.
    pub async fn is_manager_phone_taken<'e>(
        executor: impl PgExecutor<'e>,
        phone: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM manager_contacts WHERE phone_number = $1)",
        )
        .bind(phone)
        .fetch_one(executor)
        .await
    }

    /// Serialize identifier-claiming writes until the transaction ends, so two
    /// concurrent mutations cannot both pass the checks below.
    pub async fn lock_identifiers<'e>(executor: impl PgExecutor<'e>) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(IDENTIFIER_LOCK_KEY)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Take the identifier lock and check every intent, failing with the
    /// first `UniquenessConflict` found (account, then cs phone, then manager
    /// phones in order).
    pub async fn ensure_available(
        conn: &mut PgConnection,
        intents: &IdentifierIntents<'_>,
    ) -> StoreResult<()> {
        if intents.is_empty() {
            return Ok(());
        }
        Self::lock_identifiers(&mut *conn).await?;

        if let Some(account) = intents.account {
            if Self::is_account_taken(&mut *conn, account).await? {
                return Err(conflict(UniqueField::Account));
            }
        }
        if let Some(phone) = intents.cs_phone {
            if Self::is_cs_phone_taken(&mut *conn, phone).await? {
                return Err(conflict(UniqueField::CsPhone));
            }
        }
        for phone in &intents.manager_phones {
            if Self::is_manager_phone_taken(&mut *conn, phone).await? {
                return Err(conflict(UniqueField::ManagerPhone));
            }
        }
        Ok(())
    }
}

fn conflict(field: UniqueField) -> crate::error::StoreError {
    CoreError::UniquenessConflict { field }.into()
}
