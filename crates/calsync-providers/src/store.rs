//! Integration record persistence.
//!
//! [`IntegrationStore`] is the seam to whatever owns user data. The sync
//! client reads records through it and writes back refreshed access tokens.
//! [`JsonFileStore`] is a small file-backed implementation used by the CLI.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use calsync_core::IntegrationRecord;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::provider::BoxFuture;

/// Errors raised by an integration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing data could not be parsed or serialized.
    #[error("invalid integration data: {0}")]
    Serde(#[from] serde_json::Error),

    /// A token update targeted a user without a record.
    #[error("no integration record for user {user_id}")]
    MissingIntegration { user_id: String },

    /// Any other backend failure.
    #[error("integration store error: {0}")]
    Backend(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A specialized Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write access to per-user integration records.
pub trait IntegrationStore: Send + Sync {
    /// Returns the integration record for `user_id`, if one exists.
    fn get_integration<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<IntegrationRecord>>>;

    /// Replaces the access token of `user_id` with one valid for `expires_in_secs`.
    fn update_tokens<'a>(
        &'a self,
        user_id: &'a str,
        access_token: &'a str,
        expires_in_secs: i64,
    ) -> BoxFuture<'a, StoreResult<()>>;
}

/// Integration records stored as one JSON object keyed by user id.
///
/// The file is re-read on every call so edits by other processes are seen.
/// Writes go through a temp file and a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts or replaces the record for `user_id`.
    #[cfg(test)]
    pub(crate) async fn insert(&self, user_id: &str, record: IntegrationRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_all().await?;
        records.insert(user_id.to_string(), record);
        self.save_all(&records).await
    }

    /// Loads every record. A missing file means no records.
    async fn load_all(&self) -> StoreResult<BTreeMap<String, IntegrationRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no integration file");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    async fn save_all(&self, records: &BTreeMap<String, IntegrationRecord>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(records)?;

        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = tokio::fs::set_permissions(&temp_path, perms).await;
        }

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), count = records.len(), "saved integrations");
        Ok(())
    }
}

impl IntegrationStore for JsonFileStore {
    fn get_integration<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<IntegrationRecord>>> {
        Box::pin(async move {
            let mut records = self.load_all().await?;
            Ok(records.remove(user_id))
        })
    }

    fn update_tokens<'a>(
        &'a self,
        user_id: &'a str,
        access_token: &'a str,
        expires_in_secs: i64,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            let mut records = self.load_all().await?;
            let record = records
                .get_mut(user_id)
                .ok_or_else(|| StoreError::MissingIntegration {
                    user_id: user_id.to_string(),
                })?;
            record.apply_refresh(access_token, expires_in_secs, Utc::now());
            self.save_all(&records).await
        })
    }
}
