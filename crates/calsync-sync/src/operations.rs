//! Event operations against a user's connected calendar.
//!
//! Every operation obtains a valid access token, performs one provider call
//! and turns the outcome into an [`OperationResult`]. If the provider rejects
//! the token, the token is refreshed once and the call repeated once.

use std::sync::Arc;
use std::time::Duration;

use calsync_core::{CalendarEvent, OperationError, OperationKind, OperationResult};
use calsync_providers::{CalendarProvider, IntegrationStore, ProviderError, ProviderResult};
use tracing::{info, instrument, warn};

use crate::error::{SyncResult, TokenError};
use crate::normalize::{is_already_gone, is_auth_rejection, normalize};
use crate::tokens::TokenManager;

/// Tuning for [`CalendarSync`].
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Upper bound for a whole operation, token refresh and retry included.
    pub operation_timeout: Option<Duration>,
}

impl SyncConfig {
    /// Sets the operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }
}

/// Creates, updates and deletes events on behalf of users.
pub struct CalendarSync {
    provider: Arc<dyn CalendarProvider>,
    tokens: TokenManager,
    config: SyncConfig,
}

impl CalendarSync {
    /// Creates a sync client over the given provider and integration store.
    pub fn new(provider: Arc<dyn CalendarProvider>, store: Arc<dyn IntegrationStore>) -> Self {
        Self {
            tokens: TokenManager::new(provider.clone(), store),
            provider,
            config: SyncConfig::default(),
        }
    }

    /// Replaces the default configuration.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the token manager used by the operations.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Creates `event` in the user's calendar.
    ///
    /// On success the result carries the id assigned by the provider.
    #[instrument(skip(self, event))]
    pub async fn create_event(
        &self,
        user_id: &str,
        event: &CalendarEvent,
    ) -> SyncResult<OperationResult> {
        self.execute(user_id, Mutation::Create(event)).await
    }

    /// Replaces the event `event_id` with `event`.
    #[instrument(skip(self, event))]
    pub async fn update_event(
        &self,
        user_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> SyncResult<OperationResult> {
        self.execute(user_id, Mutation::Update(event_id, event)).await
    }

    /// Deletes the event `event_id`.
    ///
    /// Deleting an event the provider no longer knows succeeds.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, user_id: &str, event_id: &str) -> SyncResult<OperationResult> {
        self.execute(user_id, Mutation::Delete(event_id)).await
    }

    async fn execute(&self, user_id: &str, mutation: Mutation<'_>) -> SyncResult<OperationResult> {
        let Some(limit) = self.config.operation_timeout else {
            return self.attempt(user_id, &mutation).await;
        };

        match tokio::time::timeout(limit, self.attempt(user_id, &mutation)).await {
            Ok(result) => result,
            Err(_) => {
                let kind = mutation.kind();
                warn!(
                    user_id,
                    operation = %kind,
                    timeout_secs = limit.as_secs(),
                    "operation timed out"
                );
                Ok(OperationResult::failure(OperationError::new(
                    kind.fallback_code(),
                    format!("operation timed out after {}s", limit.as_secs()),
                )))
            }
        }
    }

    async fn attempt(&self, user_id: &str, mutation: &Mutation<'_>) -> SyncResult<OperationResult> {
        let kind = mutation.kind();

        let token = match settle_token(kind, self.tokens.get_valid_token(user_id).await)? {
            Ok(token) => token,
            Err(failed) => return Ok(failed),
        };

        let outcome = match mutation.send(self.provider.as_ref(), &token).await {
            Err(e) if is_auth_rejection(&e) => {
                info!(user_id, operation = %kind, "access token rejected, refreshing once");
                let token = match settle_token(kind, self.tokens.force_refresh(user_id).await)? {
                    Ok(token) => token,
                    Err(failed) => return Ok(failed),
                };
                mutation.send(self.provider.as_ref(), &token).await
            }
            other => other,
        };

        let result = match outcome {
            Ok(event_id) => OperationResult::Success { event_id },
            Err(e) if kind == OperationKind::Delete && is_already_gone(&e) => {
                info!(user_id, status = ?e.status(), "event already gone");
                OperationResult::Success {
                    event_id: mutation.event_id().map(String::from),
                }
            }
            Err(e) => return Ok(failure(kind, &e)),
        };

        info!(user_id, operation = %kind, event_id = ?result.event_id(), "operation succeeded");
        Ok(result)
    }
}

/// One provider call, replayable for the authorization retry.
enum Mutation<'a> {
    Create(&'a CalendarEvent),
    Update(&'a str, &'a CalendarEvent),
    Delete(&'a str),
}

impl Mutation<'_> {
    fn kind(&self) -> OperationKind {
        match self {
            Self::Create(_) => OperationKind::Create,
            Self::Update(..) => OperationKind::Update,
            Self::Delete(_) => OperationKind::Delete,
        }
    }

    fn event_id(&self) -> Option<&str> {
        match self {
            Self::Create(_) => None,
            Self::Update(id, _) | Self::Delete(id) => Some(*id),
        }
    }

    /// Performs the call, returning the affected event id.
    async fn send(
        &self,
        provider: &dyn CalendarProvider,
        access_token: &str,
    ) -> ProviderResult<Option<String>> {
        match self {
            Self::Create(event) => provider
                .create_event(event, access_token)
                .await
                .map(|created| Some(created.id)),
            Self::Update(event_id, event) => provider
                .update_event(event_id, event, access_token)
                .await
                .map(|updated| Some(updated.id)),
            Self::Delete(event_id) => provider
                .delete_event(event_id, access_token)
                .await
                .map(|()| Some(event_id.to_string())),
        }
    }
}

/// Splits a token lookup into a usable token, a failed result, or a fatal error.
fn settle_token(
    kind: OperationKind,
    token: Result<String, TokenError>,
) -> SyncResult<Result<String, OperationResult>> {
    match token {
        Ok(token) => Ok(Ok(token)),
        Err(TokenError::Sync(e)) => Err(e),
        Err(TokenError::Refresh(e)) => Ok(Err(failure(kind, &e))),
    }
}

fn failure(kind: OperationKind, error: &ProviderError) -> OperationResult {
    let normalized = normalize(kind, error);
    warn!(
        operation = %kind,
        code = %normalized.code,
        error = %error,
        "operation failed"
    );
    OperationResult::failure(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::testing::*;
    use calsync_core::ErrorCode;
    use calsync_providers::{ProviderErrorCode, ProviderEvent, RefreshedToken};

    fn sync(provider: &Arc<FakeProvider>, store: &Arc<FakeStore>) -> CalendarSync {
        CalendarSync::new(provider.clone(), store.clone())
    }

    #[tokio::test]
    async fn create_returns_provider_id() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_create(Ok(ProviderEvent::new("abc123")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();
        assert_eq!(result, OperationResult::success("abc123"));
        assert_eq!(provider.tokens_seen(), vec![CACHED_TOKEN]);
        assert_eq!(provider.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn create_failure_without_details_uses_fallback() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_create(Err(ProviderError::new(ProviderErrorCode::InternalError, "")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();
        assert_eq!(
            result,
            OperationResult::failure(OperationError::new(
                "CREATE_FAILED",
                "Failed to create calendar event"
            ))
        );
    }

    #[tokio::test]
    async fn update_returns_provider_id() {
        let provider = Arc::new(FakeProvider::new());
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .update_event(USER, "evt-7", &interview())
            .await
            .unwrap();
        assert_eq!(result.event_id(), Some("evt-7"));
    }

    #[tokio::test]
    async fn update_failure_keeps_provider_details() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_update(Err(ProviderError::from_status(403, "Forbidden")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .update_event(USER, "evt-7", &interview())
            .await
            .unwrap();
        let error = result.error().unwrap();
        assert_eq!(error.code, ErrorCode::Status(403));
        assert_eq!(error.message, "Forbidden");
    }

    #[tokio::test]
    async fn update_failure_without_details_uses_fallback() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_update(Err(ProviderError::internal("")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .update_event(USER, "evt-7", &interview())
            .await
            .unwrap();
        let error = result.error().unwrap();
        assert_eq!(error.code, ErrorCode::from("UPDATE_FAILED"));
        assert_eq!(error.message, "Failed to update calendar event");
    }

    #[tokio::test]
    async fn delete_succeeds() {
        let provider = Arc::new(FakeProvider::new());
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .delete_event(USER, "evt-1")
            .await
            .unwrap();
        assert_eq!(result, OperationResult::success("evt-1"));
    }

    #[tokio::test]
    async fn delete_of_missing_event_succeeds() {
        for gone in [
            ProviderError::from_status(404, "Not Found"),
            ProviderError::from_status(410, "Resource has been deleted"),
            ProviderError::not_found("event does not exist"),
        ] {
            let provider = Arc::new(FakeProvider::new());
            provider.push_delete(Err(gone));
            let store = Arc::new(FakeStore::with_record(USER, valid_record()));

            let result = sync(&provider, &store)
                .delete_event(USER, "evt-1")
                .await
                .unwrap();
            assert_eq!(result, OperationResult::success("evt-1"));
        }
    }

    #[tokio::test]
    async fn delete_server_error_is_reported() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_delete(Err(ProviderError::from_status(500, "Backend Error")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .delete_event(USER, "evt-1")
            .await
            .unwrap();
        assert_eq!(
            result,
            OperationResult::failure(OperationError::new(500u16, "Backend Error"))
        );
    }

    #[tokio::test]
    async fn create_of_missing_calendar_is_not_success() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_create(Err(ProviderError::from_status(404, "Not Found")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();
        assert_eq!(result.error().unwrap().code, ErrorCode::Status(404));
    }

    #[tokio::test]
    async fn missing_integration_is_an_error() {
        let provider = Arc::new(FakeProvider::new());
        let store = Arc::new(FakeStore::empty());

        let err = sync(&provider, &store)
            .delete_event(USER, "evt-1")
            .await
            .unwrap_err();
        assert!(err.is_integration_not_found());
        assert!(provider.tokens_seen().is_empty());
    }

    #[tokio::test]
    async fn store_read_failure_is_an_error() {
        let provider = Arc::new(FakeProvider::new());
        let store = Arc::new(FakeStore::with_record(USER, valid_record()).failing_reads());

        let err = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Store(_)));
    }

    #[tokio::test]
    async fn refresh_failure_is_a_failed_result() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_refresh(Err(ProviderError::from_status(
            400,
            "token refresh failed: invalid_grant",
        )));
        let store = Arc::new(FakeStore::with_record(USER, expired_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();
        let error = result.error().unwrap();
        assert_eq!(error.code, ErrorCode::Status(400));
        assert_eq!(error.message, "token refresh failed: invalid_grant");
        assert!(provider.tokens_seen().is_empty());
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_before_create() {
        let provider = Arc::new(FakeProvider::new());
        let store = Arc::new(FakeStore::with_record(USER, expired_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(provider.refresh_calls(), 1);
        assert_eq!(
            store.updates(),
            vec![(USER.to_string(), REFRESHED_TOKEN.to_string(), 3600)]
        );
        assert_eq!(provider.tokens_seen(), vec![REFRESHED_TOKEN]);
    }

    #[tokio::test]
    async fn out_of_range_token_lifetime_still_creates() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_refresh(Ok(RefreshedToken::new("long-lived", i64::MAX)));
        let store = Arc::new(FakeStore::with_record(USER, expired_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(provider.tokens_seen(), vec!["long-lived"]);
        let stored = store.record(USER).unwrap();
        assert_eq!(stored.access_token, "long-lived");
        assert!(crate::is_expired(stored.token_expiry));
    }

    #[tokio::test]
    async fn rejected_token_is_refreshed_and_retried_once() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_create(Err(ProviderError::from_status(401, "Invalid Credentials")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();

        assert_eq!(result, OperationResult::success("event-created"));
        assert_eq!(store.updates().len(), 1);
        assert_eq!(provider.refresh_calls(), 1);
        assert_eq!(provider.tokens_seen(), vec![CACHED_TOKEN, REFRESHED_TOKEN]);
    }

    #[tokio::test]
    async fn second_rejection_is_reported() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_update(Err(ProviderError::from_status(401, "Invalid Credentials")));
        provider.push_update(Err(ProviderError::from_status(401, "Invalid Credentials")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .update_event(USER, "evt-7", &interview())
            .await
            .unwrap();

        assert_eq!(result.error().unwrap().code, ErrorCode::Status(401));
        assert_eq!(provider.tokens_seen().len(), 2);
        assert_eq!(provider.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn delete_retries_after_rejection() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_delete(Err(ProviderError::authentication("token expired")));
        provider.push_delete(Err(ProviderError::from_status(410, "Gone")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .delete_event(USER, "evt-1")
            .await
            .unwrap();

        assert_eq!(result, OperationResult::success("evt-1"));
        assert_eq!(provider.tokens_seen(), vec![CACHED_TOKEN, REFRESHED_TOKEN]);
    }

    #[tokio::test]
    async fn failed_forced_refresh_is_reported() {
        let provider = Arc::new(FakeProvider::new());
        provider.push_create(Err(ProviderError::from_status(401, "Invalid Credentials")));
        provider.push_refresh(Err(ProviderError::network("token endpoint unreachable")));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));

        let result = sync(&provider, &store)
            .create_event(USER, &interview())
            .await
            .unwrap();

        let error = result.error().unwrap();
        assert_eq!(error.code, ErrorCode::from("CREATE_FAILED"));
        assert_eq!(error.message, "token endpoint unreachable");
        assert_eq!(provider.tokens_seen(), vec![CACHED_TOKEN]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out() {
        let provider = Arc::new(FakeProvider::new().with_delay(Duration::from_secs(60)));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));
        let sync = sync(&provider, &store)
            .with_config(SyncConfig::default().with_operation_timeout(Duration::from_secs(5)));

        let result = sync.delete_event(USER, "evt-1").await.unwrap();
        assert_eq!(
            result,
            OperationResult::failure(OperationError::new(
                "DELETE_FAILED",
                "operation timed out after 5s"
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fast_operation_beats_timeout() {
        let provider = Arc::new(FakeProvider::new().with_delay(Duration::from_secs(1)));
        let store = Arc::new(FakeStore::with_record(USER, valid_record()));
        let sync = sync(&provider, &store)
            .with_config(SyncConfig::default().with_operation_timeout(Duration::from_secs(5)));

        let result = sync.create_event(USER, &interview()).await.unwrap();
        assert_eq!(result, OperationResult::success("event-created"));
    }
}
