//! Mapping of provider errors onto operation results.

use calsync_core::{ErrorCode, OperationError, OperationKind};
use calsync_providers::{ProviderError, ProviderErrorCode};

/// Converts a provider error into the error reported to callers.
///
/// The provider's HTTP status and message are kept verbatim. A missing status
/// becomes the operation's fallback code and an empty message its fallback
/// text.
pub fn normalize(kind: OperationKind, error: &ProviderError) -> OperationError {
    let code = match error.status() {
        Some(status) => ErrorCode::Status(status),
        None => ErrorCode::from(kind.fallback_code()),
    };

    let message = if error.message().is_empty() {
        kind.fallback_message().to_string()
    } else {
        error.message().to_string()
    };

    OperationError::new(code, message)
}

/// Returns true if the error says the target event no longer exists.
///
/// A delete that fails this way has reached its goal.
pub fn is_already_gone(error: &ProviderError) -> bool {
    matches!(error.status(), Some(404 | 410)) || error.code() == ProviderErrorCode::NotFound
}

/// Returns true if the provider refused the access token.
pub fn is_auth_rejection(error: &ProviderError) -> bool {
    error.status() == Some(401) || error.code() == ProviderErrorCode::AuthenticationFailed
}
