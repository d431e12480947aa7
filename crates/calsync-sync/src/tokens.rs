//! Access token management.
//!
//! The [`TokenManager`] hands out an access token for a user, refreshing it
//! through the provider when it is expired or about to expire, and writes the
//! refreshed token back to the integration store before returning it.

use std::sync::Arc;
use std::time::Duration;

use calsync_core::IntegrationRecord;
use calsync_providers::{CalendarProvider, IntegrationStore};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{SyncError, TokenError};

/// Tokens expiring within this margin are treated as already expired.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Returns true if a token expiring at `expiry` should be refreshed now.
pub fn is_expired(expiry: DateTime<Utc>) -> bool {
    is_expired_at(expiry, Utc::now())
}

/// Returns true if a token expiring at `expiry` should be refreshed at `now`.
pub fn is_expired_at(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let margin = chrono::Duration::seconds(EXPIRY_MARGIN.as_secs() as i64);
    expiry
        .checked_sub_signed(margin)
        .is_none_or(|refresh_at| now >= refresh_at)
}

/// An access token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidToken {
    /// Bearer credential for provider calls.
    pub access_token: String,
    /// When the provider stops accepting it.
    pub expires_at: DateTime<Utc>,
    /// Whether it was obtained from the provider by this call.
    pub refreshed: bool,
}

/// Obtains valid access tokens for users.
///
/// Holds no state of its own: every call reads the integration record from
/// the store. Concurrent refreshes for the same user are last-write-wins.
pub struct TokenManager {
    provider: Arc<dyn CalendarProvider>,
    store: Arc<dyn IntegrationStore>,
}

impl TokenManager {
    /// Creates a token manager over the given collaborators.
    pub fn new(provider: Arc<dyn CalendarProvider>, store: Arc<dyn IntegrationStore>) -> Self {
        Self { provider, store }
    }

    /// Returns the integration record of `user_id`.
    async fn integration(&self, user_id: &str) -> Result<IntegrationRecord, SyncError> {
        self.store
            .get_integration(user_id)
            .await?
            .ok_or_else(|| SyncError::IntegrationNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Returns an access token for `user_id` that is valid beyond the expiry margin.
    ///
    /// The cached token is returned as is when still valid. Otherwise a new
    /// one is obtained from the provider and persisted first.
    pub async fn get_valid_token(&self, user_id: &str) -> Result<String, TokenError> {
        Ok(self.valid_token(user_id).await?.access_token)
    }

    /// Like [`get_valid_token`](Self::get_valid_token), also reporting the
    /// expiry and whether a refresh happened.
    pub async fn valid_token(&self, user_id: &str) -> Result<ValidToken, TokenError> {
        let record = self.integration(user_id).await?;

        if !is_expired(record.token_expiry) {
            debug!(user_id, expiry = %record.token_expiry, "using cached access token");
            return Ok(ValidToken {
                access_token: record.access_token,
                expires_at: record.token_expiry,
                refreshed: false,
            });
        }

        debug!(user_id, expiry = %record.token_expiry, "access token expired or expiring");
        self.refresh(user_id, &record.refresh_token).await
    }

    /// Obtains a new access token for `user_id` regardless of the cached expiry.
    pub async fn force_refresh(&self, user_id: &str) -> Result<String, TokenError> {
        let record = self.integration(user_id).await?;
        Ok(self.refresh(user_id, &record.refresh_token).await?.access_token)
    }

    async fn refresh(&self, user_id: &str, refresh_token: &str) -> Result<ValidToken, TokenError> {
        let issued_at = Utc::now();
        let refreshed = self
            .provider
            .refresh_token(refresh_token)
            .await
            .map_err(TokenError::Refresh)?;

        // The new token is used even when persisting it fails.
        match self
            .store
            .update_tokens(user_id, &refreshed.access_token, refreshed.expires_in_secs)
            .await
        {
            Ok(()) => info!(
                user_id,
                expires_in = refreshed.expires_in_secs,
                "refreshed access token"
            ),
            Err(e) => warn!(
                user_id,
                error = %e,
                "failed to persist refreshed access token, using it for this call only"
            ),
        }

        Ok(ValidToken {
            expires_at: IntegrationRecord::expiry_after(issued_at, refreshed.expires_in_secs),
            access_token: refreshed.access_token,
            refreshed: true,
        })
    }
}
