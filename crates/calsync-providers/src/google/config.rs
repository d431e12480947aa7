//! Google Calendar provider configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// OAuth 2.0 client credentials, needed to redeem refresh tokens.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
}

/// Structure of Google's OAuth credentials JSON file.
///
/// Accepts the Cloud Console download (`installed` or `web` section) as well
/// as a flat `client_id`/`client_secret` object.
#[derive(Debug, Deserialize)]
struct GoogleCredentialsFile {
    installed: Option<NestedCredentials>,
    web: Option<NestedCredentials>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NestedCredentials {
    client_id: String,
    client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Loads OAuth credentials from a Google Cloud Console JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read credentials file: {}", e))?;
        Self::from_json(&content)
    }

    /// Parses OAuth credentials from a Google credentials JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: GoogleCredentialsFile = serde_json::from_str(json)
            .map_err(|e| format!("failed to parse credentials JSON: {}", e))?;

        if let Some(creds) = file.installed.or(file.web) {
            return Ok(Self::new(creds.client_id, creds.client_secret));
        }

        if let (Some(client_id), Some(client_secret)) = (file.client_id, file.client_secret) {
            return Ok(Self::new(client_id, client_secret));
        }

        Err("credentials file must contain 'installed'/'web' section or 'client_id'/'client_secret' at root level".to_string())
    }

    /// Validates that the credentials look like Google OAuth credentials.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if !self.client_id.ends_with(".apps.googleusercontent.com") {
            return Err("client_id should end with .apps.googleusercontent.com");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

/// Who Google should email about a change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SendUpdates {
    /// Notify every guest.
    All,
    /// Notify guests outside the organizer's domain only.
    ExternalOnly,
    /// Notify nobody.
    #[default]
    None,
}

impl SendUpdates {
    /// Returns the `sendUpdates` query parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ExternalOnly => "externalOnly",
            Self::None => "none",
        }
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth credentials used for token refresh.
    pub credentials: OAuthCredentials,

    /// Calendar that receives the events. Defaults to `"primary"`.
    pub calendar_id: String,

    /// Base URL of the Calendar API v3.
    pub api_base_url: String,

    /// OAuth token endpoint.
    pub token_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Guest notification policy for mutations.
    pub send_updates: SendUpdates,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Production Calendar API base URL.
    pub const DEFAULT_API_BASE_URL: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Production OAuth token endpoint.
    pub const DEFAULT_TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    /// Creates a new Google configuration with the given credentials.
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            calendar_id: "primary".to_string(),
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            token_url: Self::DEFAULT_TOKEN_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calsync/{}", env!("CARGO_PKG_VERSION")),
            send_updates: SendUpdates::default(),
        }
    }

    /// Sets the target calendar.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Sets the API base URL (trailing slashes are dropped).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the OAuth token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the guest notification policy.
    pub fn with_send_updates(mut self, send_updates: SendUpdates) -> Self {
        self.send_updates = send_updates;
        self
    }

    /// Returns the events collection URL of the configured calendar.
    pub fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    /// Returns the URL of a single event.
    pub fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.calendar_id.is_empty() {
            return Err("calendar_id must not be empty".to_string());
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}
