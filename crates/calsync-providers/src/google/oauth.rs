//! OAuth 2.0 refresh-token grant against Google's token endpoint.
//!
//! Obtaining the initial refresh token (the consent flow) happens elsewhere;
//! this client only redeems an existing refresh token for a new access token.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::RefreshedToken;

use super::config::OAuthCredentials;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Longest `expires_in` accepted from the token endpoint (30 days).
const MAX_EXPIRES_IN_SECS: i64 = 30 * 24 * 3600;

/// OAuth client for Google's token endpoint.
#[derive(Debug)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    token_url: String,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client sharing the given HTTP client.
    pub fn new(
        credentials: OAuthCredentials,
        token_url: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            http_client,
        }
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// A rejected grant keeps the endpoint's HTTP status; Google answers
    /// `400 invalid_grant` for revoked or expired refresh tokens.
    pub async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<RefreshedToken> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        debug!(url = %self.token_url, "requesting access token refresh");

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::network(format!("token refresh request failed: {}", e))
                    .with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read token response: {}", e))
        })?;

        if !status.is_success() {
            return Err(ProviderError::from_status(
                status.as_u16(),
                token_error_message(&body, status.as_u16()),
            ));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })?;

        let expires_in = token_response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        if !(1..=MAX_EXPIRES_IN_SECS).contains(&expires_in) {
            return Err(ProviderError::invalid_response(format!(
                "implausible expires_in in token response: {}",
                expires_in
            )));
        }

        info!(expires_in, "refreshed access token");
        Ok(RefreshedToken::new(token_response.access_token, expires_in))
    }
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Error body from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Builds a readable message from a token endpoint error body.
fn token_error_message(body: &str, status: u16) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error,
            error_description: Some(description),
        }) => format!("token refresh failed: {} ({})", description, error),
        Ok(TokenErrorResponse { error, .. }) => format!("token refresh failed: {}", error),
        Err(_) if body.trim().is_empty() => format!("token refresh failed with status {}", status),
        Err(_) => format!("token refresh failed: {}", body.trim()),
    }
}
