//! Operation results returned to callers of the sync client.
//!
//! Expected failures (provider rejections, refresh failures) are values, not
//! errors: every event operation yields an [`OperationResult`] that is either
//! a success carrying the event id or a failure carrying an
//! [`OperationError`].
//!
//! On the wire the result keeps the flat shape callers already consume:
//!
//! ```text
//! { "success": true,  "eventId": "abc123" }
//! { "success": false, "error": { "code": 500, "message": "Backend Error" } }
//! { "success": false, "error": { "code": "DELETE_FAILED", "message": "..." } }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of remote mutation an operation performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Event creation.
    Create,
    /// Event update.
    Update,
    /// Event deletion.
    Delete,
}

impl OperationKind {
    /// Returns the code used when the provider error carries none.
    pub fn fallback_code(&self) -> &'static str {
        match self {
            Self::Create => "CREATE_FAILED",
            Self::Update => "UPDATE_FAILED",
            Self::Delete => "DELETE_FAILED",
        }
    }

    /// Returns the message used when the provider error carries none.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Create => "Failed to create calendar event",
            Self::Update => "Failed to update calendar event",
            Self::Delete => "Failed to delete calendar event",
        }
    }

    /// Returns a lowercase verb for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error code reported to callers.
///
/// Provider failures keep the provider's numeric status; failures without one
/// get a named fallback such as `CREATE_FAILED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// HTTP-style status reported by the provider.
    Status(u16),
    /// Named code.
    Named(String),
}

impl ErrorCode {
    /// Returns the numeric status, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Named(_) => None,
        }
    }
}

impl From<u16> for ErrorCode {
    fn from(status: u16) -> Self {
        Self::Status(status)
    }
}

impl From<&str> for ErrorCode {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{}", status),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Failure details of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Provider status or fallback code.
    pub code: ErrorCode,
    /// Provider message or fallback text.
    pub message: String,
}

impl OperationError {
    /// Creates a new operation error.
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Outcome of a single create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResult", try_from = "WireResult")]
pub enum OperationResult {
    /// The remote calendar is in the requested state.
    Success {
        /// Id of the affected event, when one exists.
        event_id: Option<String>,
    },
    /// The mutation failed.
    Failure {
        /// What went wrong.
        error: OperationError,
    },
}

impl OperationResult {
    /// Creates a success result for the given event.
    pub fn success(event_id: impl Into<String>) -> Self {
        Self::Success {
            event_id: Some(event_id.into()),
        }
    }

    /// Creates a failure result.
    pub fn failure(error: OperationError) -> Self {
        Self::Failure { error }
    }

    /// Returns true if the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the event id of a successful operation.
    pub fn event_id(&self) -> Option<&str> {
        match self {
            Self::Success { event_id } => event_id.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error of a failed operation.
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// Flat serialized form of [`OperationResult`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<OperationError>,
}

impl From<OperationResult> for WireResult {
    fn from(result: OperationResult) -> Self {
        match result {
            OperationResult::Success { event_id } => Self {
                success: true,
                event_id,
                error: None,
            },
            OperationResult::Failure { error } => Self {
                success: false,
                event_id: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<WireResult> for OperationResult {
    type Error = String;

    fn try_from(wire: WireResult) -> Result<Self, Self::Error> {
        match (wire.success, wire.error) {
            (true, _) => Ok(Self::Success {
                event_id: wire.event_id,
            }),
            (false, Some(error)) => Ok(Self::Failure { error }),
            (false, None) => Err("failed result is missing its error".to_string()),
        }
    }
}
