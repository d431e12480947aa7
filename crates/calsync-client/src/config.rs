//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calsync/config.toml` by default.
//!
//! Credential values (`client_id`, `client_secret`) support secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment
//! - plain text used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use calsync_providers::google::{GoogleConfig, OAuthCredentials, SendUpdates};
use calsync_sync::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::secret::SecretRef;

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the calsync client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User whose integration is used when `--user` is not given.
    pub user_id: Option<String>,

    /// Google Calendar settings.
    pub google: Option<GoogleSettings>,

    /// Integration store settings.
    pub store: StoreSettings,

    /// Operation settings.
    pub sync: SyncSettings,
}

/// Where integration records are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the integrations JSON file.
    pub path: Option<PathBuf>,
}

impl StoreSettings {
    /// Returns the configured path, or the default one in the data directory.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| ClientConfig::default_data_dir().join("integrations.json"))
    }
}

/// Operation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Upper bound in seconds for one create, update or delete.
    pub timeout_secs: Option<u64>,
}

impl SyncSettings {
    /// Converts to the sync client configuration.
    pub fn to_sync_config(&self) -> SyncConfig {
        match self.timeout_secs {
            Some(secs) => SyncConfig::default().with_operation_timeout(Duration::from_secs(secs)),
            None => SyncConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the user to act for: the override if given, else `user_id`.
    pub fn user_id(&self, override_user: Option<&str>) -> Result<String, String> {
        override_user
            .or(self.user_id.as_deref())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| "no user given: pass --user or set user_id in config.toml".to_string())
    }

    /// Returns the Google settings, which every event command needs.
    pub fn google(&self) -> Result<&GoogleSettings, String> {
        self.google.as_ref().ok_or_else(|| {
            format!(
                "Google is not configured. Add to {}:\n  \
                 [google]\n  \
                 client_id = \"YOUR_ID.apps.googleusercontent.com\"\n  \
                 client_secret = \"YOUR_SECRET\"",
                Self::default_path().display()
            )
        })
    }

    /// Returns a copy with inline secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(google) = config.google.as_mut() {
            google.client_secret = google
                .client_secret
                .as_deref()
                .map(|s| SecretRef::parse(s).redacted());
        }
        config
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calsync")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calsync")
    }
}

// ---------------------------------------------------------------------------
// GoogleSettings
// ---------------------------------------------------------------------------

/// Google Calendar provider settings.
///
/// Credentials come either inline (`client_id`/`client_secret`, which support
/// secret references) or from a Cloud Console JSON download.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleSettings {
    /// OAuth client ID (supports `pass::` and `env::` prefixes).
    pub client_id: Option<String>,

    /// OAuth client secret (supports `pass::` and `env::` prefixes).
    pub client_secret: Option<String>,

    /// Google Cloud Console credentials JSON, used when `client_id` is unset.
    pub credentials_file: Option<PathBuf>,

    /// Target calendar (defaults to `primary`).
    pub calendar_id: Option<String>,

    /// Guest notifications for changes.
    pub send_updates: Option<SendUpdates>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,

    /// Calendar API base URL override.
    pub api_base_url: Option<String>,

    /// OAuth token endpoint override.
    pub token_url: Option<String>,
}

impl GoogleSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self) -> Result<GoogleConfig, String> {
        let credentials = self.resolve_credentials()?;
        let mut config = GoogleConfig::new(credentials);

        if let Some(ref id) = self.calendar_id {
            config = config.with_calendar_id(id);
        }
        if let Some(send_updates) = self.send_updates {
            config = config.with_send_updates(send_updates);
        }
        if let Some(secs) = self.request_timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(ref url) = self.api_base_url {
            config = config.with_api_base_url(url);
        }
        if let Some(ref url) = self.token_url {
            config = config.with_token_url(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolves the OAuth client credentials.
    ///
    /// Inline values win over `credentials_file`. Inline values pass through
    /// [`crate::secret::resolve`].
    pub fn resolve_credentials(&self) -> Result<OAuthCredentials, String> {
        let Some(raw_id) = self.client_id.as_deref() else {
            return match self.credentials_file {
                Some(ref path) => OAuthCredentials::from_file(path),
                None => Err("[google] needs client_id/client_secret or credentials_file".to_string()),
            };
        };

        let raw_secret = self.client_secret.as_deref().ok_or_else(|| {
            "client_secret is missing from [google] section in config.toml".to_string()
        })?;

        let client_id = crate::secret::resolve(raw_id)
            .map_err(|e| format!("failed to resolve client_id: {}", e))?;
        let client_secret = crate::secret::resolve(raw_secret)
            .map_err(|e| format!("failed to resolve client_secret: {}", e))?;

        Ok(OAuthCredentials::new(client_id, client_secret))
    }
}
