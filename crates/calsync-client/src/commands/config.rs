//! Configuration commands.

use std::collections::BTreeMap;

use calsync_core::IntegrationRecord;
use chrono::{DateTime, Utc};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout, inline secrets masked.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&config.redacted())
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    let google = config.google().map_err(ClientError::Config)?;
    google
        .to_provider_config()
        .map_err(|e| ClientError::Config(format!("invalid Google settings: {}", e)))?;
    println!("Google credentials are valid.");

    if config.user_id.is_none() {
        println!("No default user_id set; pass --user to event commands.");
    }
    if config.sync.timeout_secs == Some(0) {
        return Err(ClientError::Config(
            "sync.timeout_secs must be greater than zero".to_string(),
        ));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration and store file paths, and the store's layout.
pub fn path(config: &ClientConfig) -> ClientResult<()> {
    println!("{}", render_paths(config)?);
    Ok(())
}

fn render_paths(config: &ClientConfig) -> ClientResult<String> {
    Ok(format!(
        "config: {}\nstore: {}\n\nThe store maps user ids to tokens:\n{}",
        ClientConfig::default_path().display(),
        config.store.resolved_path().display(),
        store_layout()?
    ))
}

/// A one-user store file, as `calsync` reads and writes it.
fn store_layout() -> ClientResult<String> {
    let sample = IntegrationRecord::new(
        "<access token>",
        "<refresh token>",
        DateTime::<Utc>::UNIX_EPOCH,
    );
    let records = BTreeMap::from([("<user id>", sample)]);
    Ok(serde_json::to_string_pretty(&records)?)
}
