//! Client error types.

use std::fmt;

use calsync_core::{OperationError, OperationKind};
use calsync_sync::{SyncError, TokenError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Provider setup error.
    Provider(calsync_providers::ProviderError),
    /// No token can be obtained for the user.
    Sync(SyncError),
    /// The token refresh was refused.
    Token(calsync_providers::ProviderError),
    /// The provider rejected an event operation.
    Operation(OperationKind, OperationError),
    /// Output could not be rendered.
    Output(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(err) => write!(f, "provider error: {}", err),
            Self::Sync(err) => write!(f, "{}", err),
            Self::Token(err) => write!(f, "{}", err),
            Self::Operation(kind, err) => write!(f, "{} failed: {}", kind, err),
            Self::Output(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) | Self::Token(err) => Some(err),
            Self::Sync(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SyncError> for ClientError {
    fn from(err: SyncError) -> Self {
        Self::Sync(err)
    }
}

impl From<TokenError> for ClientError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sync(err) => Self::Sync(err),
            TokenError::Refresh(err) => Self::Token(err),
        }
    }
}

impl From<calsync_providers::ProviderError> for ClientError {
    fn from(err: calsync_providers::ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}
