//! Seller list search criteria and result rows.

use serde::Serialize;
use sqlx::FromRow;
use sellerdesk_core::search::DateRange;
use sellerdesk_core::types::{DbId, Timestamp};

/// Optional filters for the seller list. Every field that is `Some` narrows
/// the result; text fields match as case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellerSearchCriteria {
    /// Substring of the seller id rendered as text.
    pub seller_id: Option<String>,
    pub account: Option<String>,
    pub korean_name: Option<String>,
    pub english_name: Option<String>,
    pub status_name: Option<String>,
    pub property_name: Option<String>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub manager_email: Option<String>,
    /// Exact match.
    pub registered_product_count: Option<i32>,
    pub registered: Option<DateRange>,
}

/// One row of the seller list. Manager columns show the seller's primary
/// (earliest) contact.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SellerSearchRow {
    pub seller_id: DbId,
    pub account: String,
    pub korean_name: String,
    pub english_name: String,
    pub status_name: String,
    pub property_name: String,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub manager_email: Option<String>,
    pub registered_product_count: i32,
    pub registered_at: Timestamp,
}

/// A page of the seller list plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct SellerSearchPage {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub items: Vec<SellerSearchRow>,
}
