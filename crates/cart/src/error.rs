//! Error types for the cart store.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised while reading or persisting the cart.
///
/// Loading never returns these to the caller (a bad record yields an empty
/// cart); they surface through [`crate::PersistHandle::wait`] and
/// [`crate::CartStore::try_read`].
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The background persistence task panicked or was cancelled.
    #[error("Persistence task failed: {0}")]
    TaskFailed(String),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::Storage(StorageError::Unavailable("disk full".to_string()));
        assert_eq!(err.to_string(), "Storage error: Storage unavailable: disk full");

        let err = CartError::TaskFailed("cancelled".to_string());
        assert_eq!(err.to_string(), "Persistence task failed: cancelled");
    }

    #[test]
    fn test_serialization_error_converts() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: CartError = json_err.into();
        assert!(matches!(err, CartError::Serialization(_)));
    }
}
