//! Repository for the `manager_contacts` table.

use sqlx::{PgConnection, PgExecutor};
use sellerdesk_core::types::{DbId, Timestamp};

use crate::models::manager_contact::{ManagerContact, NewManagerContact};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, seller_id, name, email, phone_number, created_at";

/// Provides list and wholesale-replace operations for manager contacts.
pub struct ManagerContactRepo;

impl ManagerContactRepo {
    /// Contacts of a seller in insertion order; the first is the primary one.
    pub async fn list_for_seller<'e>(
        executor: impl PgExecutor<'e>,
        seller_id: DbId,
    ) -> Result<Vec<ManagerContact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manager_contacts WHERE seller_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, ManagerContact>(&query)
            .bind(seller_id)
            .fetch_all(executor)
            .await
    }

    /// Insert contacts for a seller with a single multi-row INSERT.
    pub async fn insert_all(
        conn: &mut PgConnection,
        seller_id: DbId,
        contacts: &[NewManagerContact],
        created_at: Timestamp,
    ) -> Result<Vec<ManagerContact>, sqlx::Error> {
        if contacts.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            String::from("INSERT INTO manager_contacts (seller_id, name, email, phone_number, created_at) VALUES ");
        let mut param_idx = 1u32;
        for (i, _) in contacts.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${})",
                param_idx,
                param_idx + 1,
                param_idx + 2,
                param_idx + 3,
                param_idx + 4
            ));
            param_idx += 5;
        }
        query.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, ManagerContact>(&query);
        for contact in contacts {
            q = q
                .bind(seller_id)
                .bind(&contact.name)
                .bind(&contact.email)
                .bind(&contact.phone_number)
                .bind(created_at);
        }

        let mut inserted = q.fetch_all(conn).await?;
        inserted.sort_by_key(|c| c.id);
        Ok(inserted)
    }

    /// Delete every contact of a seller and insert `contacts` in their place.
    pub async fn replace_all(
        conn: &mut PgConnection,
        seller_id: DbId,
        contacts: &[NewManagerContact],
        created_at: Timestamp,
    ) -> Result<Vec<ManagerContact>, sqlx::Error> {
        sqlx::query("DELETE FROM manager_contacts WHERE seller_id = $1")
            .bind(seller_id)
            .execute(&mut *conn)
            .await?;
        Self::insert_all(conn, seller_id, contacts, created_at).await
    }
}
