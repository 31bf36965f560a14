pub mod error;
pub mod export;
pub mod roles;
pub mod search;
pub mod seller;
pub mod status;
pub mod types;
pub mod versioning;
