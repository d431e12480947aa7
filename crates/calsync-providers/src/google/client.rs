//! Google Calendar API client.
//!
//! Low-level HTTP calls for the events collection: request building, status
//! mapping and response parsing. Each method performs exactly one request.

use calsync_core::CalendarEvent;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::ProviderEvent;

use super::config::GoogleConfig;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleCalendarClient {
    /// Creates a new client sharing the given HTTP client.
    pub fn new(config: GoogleConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Inserts an event into the configured calendar.
    pub async fn insert_event(
        &self,
        event: &CalendarEvent,
        access_token: &str,
    ) -> ProviderResult<ProviderEvent> {
        let url = self.config.events_url();
        debug!(url = %url, "inserting event");

        let request = self.http_client.post(&url).json(&ApiEventBody::from(event));
        let response = self.send(request, access_token).await?;
        parse_event_response(response).await
    }

    /// Replaces an existing event.
    pub async fn update_event(
        &self,
        event_id: &str,
        event: &CalendarEvent,
        access_token: &str,
    ) -> ProviderResult<ProviderEvent> {
        let url = self.config.event_url(event_id);
        debug!(url = %url, "updating event");

        let request = self.http_client.put(&url).json(&ApiEventBody::from(event));
        let response = self.send(request, access_token).await?;
        parse_event_response(response).await
    }

    /// Deletes an event. A 404 or 410 surfaces as a `NotFound` error.
    pub async fn delete_event(&self, event_id: &str, access_token: &str) -> ProviderResult<()> {
        let url = self.config.event_url(event_id);
        debug!(url = %url, "deleting event");

        let request = self.http_client.delete(&url);
        self.send(request, access_token).await?;
        Ok(())
    }

    /// Sends an authenticated request and turns non-success statuses into errors.
    async fn send(&self, request: RequestBuilder, access_token: &str) -> ProviderResult<Response> {
        let response = request
            .bearer_auth(access_token)
            .query(&[("sendUpdates", self.config.send_updates.as_str())])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = (status == StatusCode::TOO_MANY_REQUESTS)
            .then(|| {
                response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            })
            .flatten();

        let body = response.text().await.unwrap_or_default();
        let mut message = api_error_message(&body, status);
        if let Some(seconds) = retry_after {
            message = format!("{}, retry after {} seconds", message, seconds);
        }

        Err(ProviderError::from_status(status.as_u16(), message))
    }
}

/// Reads an event resource from a successful response.
async fn parse_event_response(response: Response) -> ProviderResult<ProviderEvent> {
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

    let event: ApiEventResponse = serde_json::from_str(&body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse event response: {}", e))
    })?;

    let mut provider_event = ProviderEvent::new(event.id);
    provider_event.html_link = event.html_link;
    Ok(provider_event)
}

/// Extracts Google's error message from a response body.
///
/// The API answers `{"error": {"code": 404, "message": "Not Found"}}`; any
/// other body falls back to the status' canonical reason.
fn api_error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string())
}

/// Event resource sent on insert and update.
///
/// The caller's `id` is left out: Google assigns ids on insert and takes the
/// id from the URL on update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventBody<'a> {
    summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    start: &'a calsync_core::EventDateTime,
    end: &'a calsync_core::EventDateTime,
}

impl<'a> From<&'a CalendarEvent> for ApiEventBody<'a> {
    fn from(event: &'a CalendarEvent) -> Self {
        Self {
            summary: &event.summary,
            description: event.description.as_deref(),
            location: event.location.as_deref(),
            start: &event.start,
            end: &event.end,
        }
    }
}

/// Event resource returned by insert and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventResponse {
    id: String,
    html_link: Option<String>,
}

/// Error envelope of the Calendar API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}
