pub mod auth;
pub mod seller;
