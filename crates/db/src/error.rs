//! Error type returned by seller repositories and the workflow.

use sellerdesk_core::error::CoreError;

/// PostgreSQL `lock_not_available` (lock_timeout or NOWAIT).
const PG_LOCK_NOT_AVAILABLE: &str = "55P03";
/// PostgreSQL `serialization_failure`.
const PG_SERIALIZATION_FAILURE: &str = "40001";
/// PostgreSQL `deadlock_detected`.
const PG_DEADLOCK_DETECTED: &str = "40P01";
/// PostgreSQL `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Partial unique index guarding the single-active-snapshot invariant.
pub const ACTIVE_SNAPSHOT_CONSTRAINT: &str = "uq_seller_snapshots_active";

/// Business outcomes are carried as [`CoreError`]; everything else the
/// database reports is a storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(PG_LOCK_NOT_AVAILABLE) => {
                    return StoreError::Core(CoreError::ConcurrentModification(
                        "seller is being modified by another request".into(),
                    ));
                }
                Some(PG_SERIALIZATION_FAILURE) | Some(PG_DEADLOCK_DETECTED) => {
                    return StoreError::Core(CoreError::ConcurrentModification(
                        "transaction conflicted with a concurrent update".into(),
                    ));
                }
                Some(PG_UNIQUE_VIOLATION)
                    if db_err.constraint() == Some(ACTIVE_SNAPSHOT_CONSTRAINT) =>
                {
                    return StoreError::Core(CoreError::Conflict(
                        "seller already has an active snapshot".into(),
                    ));
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::Core(CoreError::Validation(format!(
                        "unknown reference ({})",
                        db_err.constraint().unwrap_or("foreign key")
                    )));
                }
                _ => {}
            }
        }
        StoreError::Storage(err)
    }
}

impl StoreError {
    /// The domain error, if this is a business outcome.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            StoreError::Core(core) => Some(core),
            StoreError::Storage(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.as_core().is_some_and(CoreError::is_retryable)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn row_not_found_stays_a_storage_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, StoreError::Storage(sqlx::Error::RowNotFound));
        assert!(!err.is_retryable());
    }

    #[test]
    fn core_errors_pass_through() {
        let err = StoreError::from(CoreError::ConcurrentModification("x".into()));
        assert!(err.is_retryable());
        assert_matches!(err.as_core(), Some(CoreError::ConcurrentModification(_)));
    }
}
