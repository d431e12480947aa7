//! Error types for the sync client.

use calsync_providers::{ProviderError, StoreError};
use thiserror::Error;

/// Conditions under which no access token can be obtained at all.
///
/// These are returned as `Err` from every operation. Provider rejections,
/// including a failed token refresh, are reported as failed
/// [`OperationResult`](calsync_core::OperationResult)s instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The user has no connected calendar.
    #[error("no calendar integration found for user {user_id}")]
    IntegrationNotFound { user_id: String },

    /// The integration store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Returns true if the user has no integration record.
    pub fn is_integration_not_found(&self) -> bool {
        matches!(self, Self::IntegrationNotFound { .. })
    }
}

/// Errors returned by the token manager.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No token can be obtained for this user.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The provider refused to issue a new access token.
    #[error("token refresh failed: {0}")]
    Refresh(#[source] ProviderError),
}

/// A specialized Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_integration_is_distinguishable() {
        let err = SyncError::IntegrationNotFound {
            user_id: "user-1".into(),
        };
        assert!(err.is_integration_not_found());
        assert_eq!(
            err.to_string(),
            "no calendar integration found for user user-1"
        );

        let err = SyncError::from(StoreError::Backend("disk full".into()));
        assert!(!err.is_integration_not_found());
    }

    #[test]
    fn refresh_error_wraps_provider_error() {
        let err = TokenError::Refresh(ProviderError::from_status(400, "invalid_grant"));
        assert!(err.to_string().starts_with("token refresh failed: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
