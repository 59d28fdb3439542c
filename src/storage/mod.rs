pub mod any;
pub mod local;
pub mod sqlite;
pub mod traits;

pub use any::AnyBackend;
pub use local::LocalStore;
pub use sqlite::{Database, SqliteStore};
pub use traits::StorageBackend;

use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the storage layer.
///
/// "Record not found" on optional point lookups (a user with no reflection
/// yet, an unknown user's collections) is not an error anywhere in this
/// layer — those return documented empty defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend could not be reached (network, pool, connect failures).
    #[error("storage backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The backend refused the operation (constraint violation, malformed row).
    #[error("storage backend rejected the operation: {0}")]
    BackendRejected(String),
    /// Malformed input caught at the facade boundary.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => StorageError::BackendRejected(db.to_string()),
            sqlx::Error::RowNotFound => {
                StorageError::BackendRejected("row not found".to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StorageError::BackendRejected(e.to_string())
            }
            other => StorageError::BackendUnavailable(other.to_string()),
        }
    }
}

/// Current unix time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Generate a course id. Ids are recency-correlated strings on purpose:
/// the catalog tie-break sorts equal completion counts by reverse
/// lexicographic id, which floats the newest course to the top.
pub fn generate_course_id() -> String {
    now_millis().to_string()
}

/// Generate a challenge id.
pub fn generate_challenge_id() -> String {
    now_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_numeric_strings() {
        let id = generate_course_id();
        assert!(id.parse::<u64>().is_ok());
    }

    #[test]
    fn sqlx_connect_errors_map_to_unavailable() {
        let err: StorageError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StorageError::BackendUnavailable(_)));
    }
}
