//! Seller list search over the active snapshots of non-deleted sellers.
//!
//! Count, page and export queries share one join graph ([`FROM_CLAUSE`]) and
//! one predicate set ([`build_seller_filter`]), so the total always agrees
//! with the rows a page can return.

use sqlx::PgExecutor;
use sellerdesk_core::search::{contains_pattern, Pagination, SortDirection};
use sellerdesk_core::types::Timestamp;
use sellerdesk_core::versioning::sentinel_expiry;

use crate::models::search::{SellerSearchCriteria, SellerSearchRow};

/// Columns of a [`SellerSearchRow`]. Manager columns come from the primary
/// (lowest id) contact, which keeps the list at one row per seller.
const ROW_COLUMNS: &str = "\
    s.id AS seller_id, ss.account, ss.korean_name, ss.english_name, \
    st.name AS status_name, sp.name AS property_name, \
    pm.name AS manager_name, pm.phone_number AS manager_phone, \
    pm.email AS manager_email, ss.registered_product_count, s.registered_at";

/// Join graph shared by every search query.
const FROM_CLAUSE: &str = "\
    FROM sellers s \
    JOIN seller_snapshots ss ON ss.seller_id = s.id \
    JOIN seller_properties sp ON sp.id = ss.property_id \
    JOIN seller_statuses st ON st.id = ss.status_id \
    LEFT JOIN LATERAL ( \
        SELECT mc.name, mc.email, mc.phone_number FROM manager_contacts mc \
        WHERE mc.seller_id = s.id ORDER BY mc.id ASC LIMIT 1 \
    ) pm ON true";

/// Provides count, paged and unpaged seller list queries.
pub struct SellerSearchRepo;

impl SellerSearchRepo {
    /// Number of sellers matching `criteria`.
    pub async fn count<'e>(
        executor: impl PgExecutor<'e>,
        criteria: &SellerSearchCriteria,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_seller_filter(criteria);
        let query = format!("SELECT COUNT(*)::BIGINT {FROM_CLAUSE} {where_clause}");

        let q = bind_search_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(executor).await
    }

    /// One page of matching sellers ordered by seller id.
    pub async fn page<'e>(
        executor: impl PgExecutor<'e>,
        criteria: &SellerSearchCriteria,
        sort: SortDirection,
        pagination: Pagination,
    ) -> Result<Vec<SellerSearchRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_seller_filter(criteria);
        let query = format!(
            "SELECT {ROW_COLUMNS} {FROM_CLAUSE} {where_clause} \
             ORDER BY s.id {} \
             LIMIT ${bind_idx} OFFSET ${}",
            sort.as_sql(),
            bind_idx + 1
        );

        let q = bind_search_values(sqlx::query_as::<_, SellerSearchRow>(&query), &bind_values);
        q.bind(pagination.per_page())
            .bind(pagination.offset())
            .fetch_all(executor)
            .await
    }

    /// Every matching seller, for export.
    pub async fn export<'e>(
        executor: impl PgExecutor<'e>,
        criteria: &SellerSearchCriteria,
        sort: SortDirection,
    ) -> Result<Vec<SellerSearchRow>, sqlx::Error> {
        let (where_clause, bind_values, _) = build_seller_filter(criteria);
        let query = format!(
            "SELECT {ROW_COLUMNS} {FROM_CLAUSE} {where_clause} ORDER BY s.id {}",
            sort.as_sql()
        );

        let q = bind_search_values(sqlx::query_as::<_, SellerSearchRow>(&query), &bind_values);
        q.fetch_all(executor).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built search queries.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BindValue {
    Int(i32),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from the search criteria.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause always
/// restricts to active snapshots of non-deleted sellers; each supplied filter
/// adds exactly one `AND`-ed condition.
fn build_seller_filter(criteria: &SellerSearchCriteria) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["s.is_deleted = false".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    conditions.push(format!("ss.expired_at = ${bind_idx}"));
    bind_idx += 1;
    bind_values.push(BindValue::Timestamp(sentinel_expiry()));

    let substring_filters = [
        ("s.id::text", &criteria.seller_id),
        ("ss.account", &criteria.account),
        ("ss.korean_name", &criteria.korean_name),
        ("ss.english_name", &criteria.english_name),
        ("st.name", &criteria.status_name),
        ("sp.name", &criteria.property_name),
    ];
    for (column, value) in substring_filters {
        if let Some(needle) = value {
            conditions.push(format!("{column} ILIKE ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(contains_pattern(needle)));
        }
    }

    let manager_filters = [
        ("mc.name", &criteria.manager_name),
        ("mc.phone_number", &criteria.manager_phone),
        ("mc.email", &criteria.manager_email),
    ];
    for (column, value) in manager_filters {
        if let Some(needle) = value {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM manager_contacts mc \
                 WHERE mc.seller_id = s.id AND {column} ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
            bind_values.push(BindValue::Text(contains_pattern(needle)));
        }
    }

    if let Some(count) = criteria.registered_product_count {
        conditions.push(format!("ss.registered_product_count = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(count));
    }

    if let Some(range) = criteria.registered {
        let (lower, upper) = range.bounds();
        conditions.push(format!(
            "(s.registered_at >= ${bind_idx} AND s.registered_at < ${})",
            bind_idx + 1
        ));
        bind_idx += 2;
        bind_values.push(BindValue::Timestamp(lower));
        bind_values.push(BindValue::Timestamp(upper));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_search_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_search_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
