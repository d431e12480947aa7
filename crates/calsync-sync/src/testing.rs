//! In-memory collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use calsync_core::{CalendarEvent, EventDateTime, IntegrationRecord};
use calsync_providers::{
    BoxFuture, CalendarProvider, IntegrationStore, ProviderEvent, ProviderResult,
    RefreshedToken, StoreError, StoreResult,
};
use chrono::Utc;

pub(crate) const USER: &str = "user-1";
pub(crate) const CACHED_TOKEN: &str = "cached-token";
pub(crate) const REFRESHED_TOKEN: &str = "refreshed-token";

/// A record whose access token is good for another hour.
pub(crate) fn valid_record() -> IntegrationRecord {
    IntegrationRecord::new(
        CACHED_TOKEN,
        "refresh-1",
        Utc::now() + chrono::Duration::hours(1),
    )
}

/// A record whose access token expired an hour ago.
pub(crate) fn expired_record() -> IntegrationRecord {
    IntegrationRecord::new(
        CACHED_TOKEN,
        "refresh-1",
        Utc::now() - chrono::Duration::hours(1),
    )
}

pub(crate) fn interview() -> CalendarEvent {
    CalendarEvent::new(
        "Interview with Acme",
        EventDateTime::new("2025-03-15T10:00:00", "Europe/Paris"),
        EventDateTime::new("2025-03-15T11:00:00", "Europe/Paris"),
    )
}

/// Provider answering from per-operation scripts, falling back to success.
#[derive(Default)]
pub(crate) struct FakeProvider {
    create: Mutex<VecDeque<ProviderResult<ProviderEvent>>>,
    update: Mutex<VecDeque<ProviderResult<ProviderEvent>>>,
    delete: Mutex<VecDeque<ProviderResult<()>>>,
    refresh: Mutex<VecDeque<ProviderResult<RefreshedToken>>>,
    tokens_seen: Mutex<Vec<String>>,
    refresh_calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every mutation take `delay` before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn push_create(&self, result: ProviderResult<ProviderEvent>) {
        self.create.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_update(&self, result: ProviderResult<ProviderEvent>) {
        self.update.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_delete(&self, result: ProviderResult<()>) {
        self.delete.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_refresh(&self, result: ProviderResult<RefreshedToken>) {
        self.refresh.lock().unwrap().push_back(result);
    }

    /// Access tokens passed to mutations, in call order.
    pub(crate) fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    async fn mutation_started(&self, access_token: &str) {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(access_token.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl CalendarProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn create_event<'a>(
        &'a self,
        _event: &'a CalendarEvent,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ProviderEvent>> {
        Box::pin(async move {
            self.mutation_started(access_token).await;
            let next = self.create.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(ProviderEvent::new("event-created")))
        })
    }

    fn update_event<'a>(
        &'a self,
        event_id: &'a str,
        _event: &'a CalendarEvent,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ProviderEvent>> {
        Box::pin(async move {
            self.mutation_started(access_token).await;
            let next = self.update.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(ProviderEvent::new(event_id)))
        })
    }

    fn delete_event<'a>(
        &'a self,
        _event_id: &'a str,
        access_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            self.mutation_started(access_token).await;
            let next = self.delete.lock().unwrap().pop_front();
            next.unwrap_or(Ok(()))
        })
    }

    fn refresh_token<'a>(
        &'a self,
        _refresh_token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<RefreshedToken>> {
        Box::pin(async move {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.refresh.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(RefreshedToken::new(REFRESHED_TOKEN, 3600)))
        })
    }
}

/// Store keeping records in memory and logging every token update.
#[derive(Default)]
pub(crate) struct FakeStore {
    records: Mutex<HashMap<String, IntegrationRecord>>,
    updates: Mutex<Vec<(String, String, i64)>>,
    fail_reads: bool,
    fail_updates: bool,
}

impl FakeStore {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_record(user_id: &str, record: IntegrationRecord) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap()
            .insert(user_id.to_string(), record);
        store
    }

    pub(crate) fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub(crate) fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// `(user_id, access_token, expires_in_secs)` of every update, in order.
    pub(crate) fn updates(&self) -> Vec<(String, String, i64)> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn record(&self, user_id: &str) -> Option<IntegrationRecord> {
        self.records.lock().unwrap().get(user_id).cloned()
    }
}

impl IntegrationStore for FakeStore {
    fn get_integration<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<IntegrationRecord>>> {
        Box::pin(async move {
            if self.fail_reads {
                return Err(StoreError::Backend("read failed".into()));
            }
            Ok(self.record(user_id))
        })
    }

    fn update_tokens<'a>(
        &'a self,
        user_id: &'a str,
        access_token: &'a str,
        expires_in_secs: i64,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.updates.lock().unwrap().push((
                user_id.to_string(),
                access_token.to_string(),
                expires_in_secs,
            ));
            if self.fail_updates {
                return Err(StoreError::Backend("write failed".into()));
            }
            if let Some(record) = self.records.lock().unwrap().get_mut(user_id) {
                record.apply_refresh(access_token, expires_in_secs, Utc::now());
            }
            Ok(())
        })
    }
}
