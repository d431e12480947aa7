//! CalendarProvider trait definition.
//!
//! The [`CalendarProvider`] trait is the seam between the sync client and a
//! remote calendar service. An implementation performs exactly one HTTP
//! exchange per call and reports failures as [`ProviderError`]s; it does not
//! retry, refresh tokens on its own, or touch persisted state.

use std::future::Future;
use std::pin::Pin;

use calsync_core::CalendarEvent;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the collaborator traits object-safe so they can be
/// injected as `Arc<dyn CalendarProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The provider's view of an event after a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEvent {
    /// Provider-assigned identifier.
    pub id: String,
    /// Link to the event in the provider's web UI, when reported.
    pub html_link: Option<String>,
}

impl ProviderEvent {
    /// Creates a provider event with just an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html_link: None,
        }
    }

    /// Builder method to set the web link.
    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }
}

/// A freshly issued access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    /// The new bearer credential.
    pub access_token: String,
    /// Lifetime of the token, relative to when it was issued.
    pub expires_in_secs: i64,
}

impl RefreshedToken {
    /// Creates a new refreshed token.
    pub fn new(access_token: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in_secs,
        }
    }
}

/// A remote calendar that accepts event mutations.
///
/// # Example Implementation
///
/// ```ignore
/// impl CalendarProvider for MyProvider {
///     fn name(&self) -> &str { "mine" }
///
///     fn create_event<'a>(
///         &'a self,
///         event: &'a CalendarEvent,
///         access_token: &'a str,
///     ) -> BoxFuture<'a, ProviderResult<ProviderEvent>> {
///         Box::pin(async move {
///             let id = self.post(event, access_token).await?;
///             Ok(ProviderEvent::new(id))
///         })
///     }
///     // ... other methods
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "google").
    fn name(&self) -> &str;

    /// Creates an event and returns the provider's id for it.
    fn create_event<'a>(
        &'a self,
        event: &'a CalendarEvent,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ProviderEvent>>;

    /// Replaces the event identified by `event_id` with `event`.
    fn update_event<'a>(
        &'a self,
        event_id: &'a str,
        event: &'a CalendarEvent,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ProviderEvent>>;

    /// Deletes an event.
    ///
    /// An event that is already gone is reported as a `NotFound` error; the
    /// caller decides whether that counts as success.
    fn delete_event<'a>(
        &'a self,
        event_id: &'a str,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Exchanges a refresh token for a new access token.
    fn refresh_token<'a>(
        &'a self,
        refresh_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RefreshedToken>>;
}
