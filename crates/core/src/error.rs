use std::fmt;

use serde::Serialize;

use crate::types::DbId;

/// Identifier fields that must be unique across active sellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueField {
    Account,
    CsPhone,
    ManagerPhone,
}

impl UniqueField {
    /// Stable snake_case name, used in error codes and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            UniqueField::Account => "account",
            UniqueField::CsPhone => "cs_phone",
            UniqueField::ManagerPhone => "manager_phone",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Value already in use: {field}")]
    UniquenessConflict { field: UniqueField },

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may retry the whole transaction unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::ConcurrentModification(_))
    }
}
