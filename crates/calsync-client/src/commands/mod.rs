//! Subcommand implementations.

pub mod config;
pub mod events;
pub mod token;

use std::sync::Arc;

use calsync_providers::JsonFileStore;
use calsync_providers::google::GoogleCalendarProvider;
use calsync_sync::CalendarSync;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Builds the sync client from configuration: Google provider, JSON file store.
pub fn connect(config: &ClientConfig) -> ClientResult<CalendarSync> {
    let google = config.google().map_err(ClientError::Config)?;
    let provider_config = google.to_provider_config().map_err(ClientError::Config)?;
    let provider = GoogleCalendarProvider::new(provider_config)?;

    let store_path = config.store.resolved_path();
    debug!(store = %store_path.display(), "using integration store");
    let store = JsonFileStore::new(store_path);

    Ok(CalendarSync::new(Arc::new(provider), Arc::new(store))
        .with_config(config.sync.to_sync_config()))
}
