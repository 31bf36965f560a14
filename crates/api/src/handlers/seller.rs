//! Handlers for the `/sellers` resource.
//!
//! Mutations run in a transaction opened with the configured lock timeout
//! and commit only after the workflow returned successfully; an error drops
//! the transaction, which rolls it back.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sellerdesk_core::error::CoreError;
use sellerdesk_core::export::build_csv;
use sellerdesk_core::search::{
    non_blank, DateRange, Pagination, SortDirection, DEFAULT_PER_PAGE,
};
use sellerdesk_core::seller::validate_password;
use sellerdesk_core::status::StatusId;
use sellerdesk_core::types::DbId;
use sellerdesk_db::models::manager_contact::NewManagerContact;
use sellerdesk_db::models::search::{SellerSearchCriteria, SellerSearchRow};
use sellerdesk_db::models::seller::NewSeller;
use sellerdesk_db::models::snapshot::SellerChangeSet;
use sellerdesk_db::{begin_with_lock_timeout, SellerWorkflow};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireMaster;
use crate::response::DataResponse;
use crate::state::AppState;

/// Column order of the CSV export.
const EXPORT_HEADER: [&str; 11] = [
    "seller_id",
    "account",
    "korean_name",
    "english_name",
    "status",
    "property",
    "manager_name",
    "manager_phone",
    "manager_email",
    "registered_product_count",
    "registered_at",
];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /sellers`.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub account: String,
    pub password: String,
    pub korean_name: String,
    pub english_name: String,
    pub cs_phone: String,
    pub property_id: StatusId,
    pub managers: Vec<NewManagerContact>,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub seller_id: DbId,
}

/// Request body for `PUT /sellers/{id}`.
///
/// The password arrives in plaintext and is hashed before it reaches the
/// change set; a client-supplied `password_hash` is discarded.
#[derive(Debug, Deserialize)]
pub struct UpdateSellerRequest {
    pub password: Option<String>,
    #[serde(flatten)]
    pub changes: SellerChangeSet,
}

/// Query parameters for `GET /sellers` and `GET /sellers/export`.
#[derive(Debug, Default, Deserialize)]
pub struct SellerListParams {
    pub seller_id: Option<String>,
    pub account: Option<String>,
    pub korean_name: Option<String>,
    pub english_name: Option<String>,
    pub status_name: Option<String>,
    pub property_name: Option<String>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub manager_email: Option<String>,
    pub registered_product_count: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `ASC` or `DESC` (default).
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Export only: `json` (default) or `csv`.
    pub format: Option<String>,
}

impl SellerListParams {
    fn criteria(&self) -> Result<SellerSearchCriteria, CoreError> {
        Ok(SellerSearchCriteria {
            seller_id: non_blank(self.seller_id.clone()),
            account: non_blank(self.account.clone()),
            korean_name: non_blank(self.korean_name.clone()),
            english_name: non_blank(self.english_name.clone()),
            status_name: non_blank(self.status_name.clone()),
            property_name: non_blank(self.property_name.clone()),
            manager_name: non_blank(self.manager_name.clone()),
            manager_phone: non_blank(self.manager_phone.clone()),
            manager_email: non_blank(self.manager_email.clone()),
            registered_product_count: self.registered_product_count,
            registered: DateRange::from_parts(self.start_date, self.end_date)?,
        })
    }

    fn sort(&self) -> Result<SortDirection, CoreError> {
        match non_blank(self.order.clone()) {
            Some(order) => order.parse(),
            None => Ok(SortDirection::default()),
        }
    }

    fn pagination(&self) -> Result<Pagination, CoreError> {
        Pagination::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

/// Query parameters for `GET /sellers/lookup`.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sellers
///
/// Public signup. The seller starts in the initial status.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    validate_password(&input.password)?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let new_seller = NewSeller {
        account: input.account.trim().to_string(),
        password_hash,
        korean_name: input.korean_name.trim().to_string(),
        english_name: input.english_name.trim().to_string(),
        cs_phone: input.cs_phone.trim().to_string(),
        property_id: input.property_id,
        managers: input.managers,
    };

    let mut tx = begin_with_lock_timeout(&state.pool, state.config.lock_timeout_ms).await?;
    let seller_id = SellerWorkflow::sign_up(&mut *tx, &new_seller, None).await?;
    tx.commit().await?;

    tracing::info!(seller_id, account = %new_seller.account, "Seller signed up");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SignUpResponse { seller_id },
        }),
    ))
}

/// GET /api/v1/sellers
///
/// Paged seller list for the back office. Master only.
pub async fn search(
    State(state): State<AppState>,
    RequireMaster(_master): RequireMaster,
    Query(params): Query<SellerListParams>,
) -> AppResult<impl IntoResponse> {
    let criteria = params.criteria()?;
    let page = SellerWorkflow::search(
        &state.pool,
        &criteria,
        params.sort()?,
        params.pagination()?,
    )
    .await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/sellers/export?format=csv|json
///
/// Every seller matching the list filters, unpaged. Master only.
pub async fn export(
    State(state): State<AppState>,
    RequireMaster(master): RequireMaster,
    Query(params): Query<SellerListParams>,
) -> AppResult<Response> {
    let criteria = params.criteria()?;
    let format = non_blank(params.format.clone()).unwrap_or_else(|| "json".into());
    if format != "json" && format != "csv" {
        return Err(AppError::BadRequest(format!(
            "format must be json or csv, got '{format}'"
        )));
    }

    let rows = SellerWorkflow::export(&state.pool, &criteria, params.sort()?).await?;
    tracing::info!(actor_id = master.seller_id, rows = rows.len(), %format, "Seller list exported");

    if format == "csv" {
        let csv = build_csv(&EXPORT_HEADER, rows.iter().map(csv_row));
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sellers.csv\"",
                ),
            ],
            csv,
        )
            .into_response());
    }
    Ok(Json(DataResponse { data: rows }).into_response())
}

fn csv_row(row: &SellerSearchRow) -> Vec<String> {
    vec![
        row.seller_id.to_string(),
        row.account.clone(),
        row.korean_name.clone(),
        row.english_name.clone(),
        row.status_name.clone(),
        row.property_name.clone(),
        row.manager_name.clone().unwrap_or_default(),
        row.manager_phone.clone().unwrap_or_default(),
        row.manager_email.clone().unwrap_or_default(),
        row.registered_product_count.to_string(),
        row.registered_at.to_rfc3339(),
    ]
}

/// GET /api/v1/sellers/lookup?q=&limit=
///
/// Seller picker used during product registration.
pub async fn lookup(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<LookupParams>,
) -> AppResult<impl IntoResponse> {
    let term = params.q.unwrap_or_default();
    let sellers = SellerWorkflow::lookup_by_name(&state.pool, &term, params.limit).await?;
    Ok(Json(DataResponse { data: sellers }))
}

/// GET /api/v1/sellers/{id}
pub async fn get_seller(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    user.ensure_self_or_master(id)?;
    let profile = SellerWorkflow::fetch_active_profile(&state.pool, id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/sellers/{id}
///
/// Revise a profile. Only masters may change the status.
pub async fn update_seller(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSellerRequest>,
) -> AppResult<impl IntoResponse> {
    user.ensure_self_or_master(id)?;

    let mut changes = input.changes;
    if changes.status_id.is_some() && !user.is_master() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only a master may change a seller's status".into(),
        )));
    }
    changes.password_hash = match input.password {
        Some(password) => {
            validate_password(&password)?;
            Some(
                hash_password(&password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let mut tx = begin_with_lock_timeout(&state.pool, state.config.lock_timeout_ms).await?;
    let snapshot = SellerWorkflow::revise_profile(&mut *tx, id, &changes, user.seller_id).await?;
    tx.commit().await?;

    tracing::info!(
        seller_id = id,
        actor_id = user.seller_id,
        snapshot_id = snapshot.id,
        "Seller profile revised"
    );

    Ok(Json(DataResponse { data: snapshot }))
}

/// DELETE /api/v1/sellers/{id}
///
/// Soft delete. Master only.
pub async fn delete_seller(
    State(state): State<AppState>,
    RequireMaster(master): RequireMaster,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    SellerWorkflow::soft_delete(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(seller_id = id, actor_id = master.seller_id, "Seller deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sellers/{id}/history
pub async fn status_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    user.ensure_self_or_master(id)?;
    let history = SellerWorkflow::fetch_history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/sellers/{id}/snapshots
///
/// Every stored profile version, newest first. Master only.
pub async fn list_snapshots(
    State(state): State<AppState>,
    RequireMaster(_master): RequireMaster,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let snapshots = SellerWorkflow::fetch_snapshots(&state.pool, id).await?;
    Ok(Json(DataResponse { data: snapshots }))
}
