//! Calendar provider and integration store seams.
//!
//! This crate holds the two collaborators the sync client depends on:
//!
//! - [`CalendarProvider`] - One remote calendar service, one HTTP exchange per call
//! - [`IntegrationStore`] - Persisted OAuth integration records
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────┐     ┌──────────────────┐
//! │ GoogleCalendarProvider │     │  JsonFileStore   │
//! └───────────┬────────────┘     └────────┬─────────┘
//!             │ CalendarProvider          │ IntegrationStore
//!             └─────────────┬─────────────┘
//!                           ▼
//!                     CalendarSync
//! ```

pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod provider;
pub mod store;

// Re-export main types at crate root
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{BoxFuture, CalendarProvider, ProviderEvent, RefreshedToken};
pub use store::{IntegrationStore, JsonFileStore, StoreError, StoreResult};
