//! Calendar synchronization client.
//!
//! [`CalendarSync`] pushes interview events into a user's connected calendar:
//!
//! - [`TokenManager`] - Keeps a valid access token per user, refreshing on demand
//! - [`CalendarSync`] - Create, update and idempotent delete operations
//! - [`normalize()`] - Maps provider errors onto [`OperationResult`] failures
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use calsync_sync::CalendarSync;
//!
//! let sync = CalendarSync::new(Arc::new(provider), Arc::new(store));
//! let result = sync.create_event("user-1", &event).await?;
//! if let Some(id) = result.event_id() {
//!     println!("created {id}");
//! }
//! ```
//!
//! [`OperationResult`]: calsync_core::OperationResult

pub mod error;
pub mod normalize;
pub mod operations;
pub mod tokens;

#[cfg(test)]
mod testing;

pub use error::{SyncError, SyncResult, TokenError};
pub use normalize::{is_already_gone, is_auth_rejection, normalize};
pub use operations::{CalendarSync, SyncConfig};
pub use tokens::{EXPIRY_MARGIN, TokenManager, ValidToken, is_expired, is_expired_at};
