//! Google Calendar provider implementation.
//!
//! [`GoogleCalendarProvider`] inserts, replaces and deletes events through the
//! Calendar API v3 and redeems refresh tokens at Google's OAuth endpoint.
//!
//! # Example
//!
//! ```ignore
//! use calsync_providers::google::{GoogleCalendarProvider, GoogleConfig, OAuthCredentials};
//!
//! let credentials = OAuthCredentials::new(
//!     "your-client-id.apps.googleusercontent.com",
//!     "your-client-secret",
//! );
//!
//! let provider = GoogleCalendarProvider::new(GoogleConfig::new(credentials))?;
//! let created = provider.create_event(&event, &access_token).await?;
//! ```

mod client;
mod config;
mod oauth;
mod provider;

pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, OAuthCredentials, SendUpdates};
pub use oauth::OAuthClient;
pub use provider::GoogleCalendarProvider;
