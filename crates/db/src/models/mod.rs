//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where rows are revised rather than updated, a change set (all `Option`
//!   fields) overlaid on the previous version

pub mod manager_contact;
pub mod search;
pub mod seller;
pub mod snapshot;
pub mod status_history;
