//! Google Calendar provider implementation.
//!
//! This module implements the [`CalendarProvider`] trait for Google Calendar.

use calsync_core::CalendarEvent;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, ProviderEvent, RefreshedToken};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::oauth::OAuthClient;

/// Provider name reported in errors and logs.
const PROVIDER_NAME: &str = "google";

/// Google Calendar provider.
///
/// Holds no tokens itself: every call receives the access token to use, and
/// refreshes go through [`CalendarProvider::refresh_token`].
#[derive(Debug)]
pub struct GoogleCalendarProvider {
    api_client: GoogleCalendarClient,
    oauth_client: OAuthClient,
}

impl GoogleCalendarProvider {
    /// Creates a new Google provider with the given configuration.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
            })?;

        let oauth_client = OAuthClient::new(
            config.credentials.clone(),
            config.token_url.clone(),
            http_client.clone(),
        );
        let api_client = GoogleCalendarClient::new(config, http_client);

        Ok(Self {
            api_client,
            oauth_client,
        })
    }
}

impl CalendarProvider for GoogleCalendarProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn create_event<'a>(
        &'a self,
        event: &'a CalendarEvent,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ProviderEvent>> {
        Box::pin(async move {
            self.api_client
                .insert_event(event, access_token)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }

    fn update_event<'a>(
        &'a self,
        event_id: &'a str,
        event: &'a CalendarEvent,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ProviderEvent>> {
        Box::pin(async move {
            self.api_client
                .update_event(event_id, event, access_token)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }

    fn delete_event<'a>(
        &'a self,
        event_id: &'a str,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            self.api_client
                .delete_event(event_id, access_token)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }

    fn refresh_token<'a>(
        &'a self,
        refresh_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RefreshedToken>> {
        Box::pin(async move {
            self.oauth_client
                .refresh_token(refresh_token)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}
