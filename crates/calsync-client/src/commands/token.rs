//! Token command: shows the access token state of a user.

use calsync_sync::{CalendarSync, ValidToken};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ClientResult;

/// What `calsync token` reports. The token itself is never printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatus {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub refreshed: bool,
}

/// Refreshes the user's access token if needed and prints its expiry.
pub async fn show(sync: &CalendarSync, user_id: &str, json: bool) -> ClientResult<()> {
    let token = sync.tokens().valid_token(user_id).await?;
    let status = TokenStatus::new(user_id, &token);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", render_text(&status, Utc::now()));
    }
    Ok(())
}

impl TokenStatus {
    fn new(user_id: &str, token: &ValidToken) -> Self {
        Self {
            user_id: user_id.to_string(),
            expires_at: token.expires_at,
            refreshed: token.refreshed,
        }
    }
}

fn render_text(status: &TokenStatus, now: DateTime<Utc>) -> String {
    let minutes = (status.expires_at - now).num_minutes();
    let state = if minutes > 0 {
        format!("valid until {} ({} min left)", status.expires_at.to_rfc3339(), minutes)
    } else {
        format!("expired at {}", status.expires_at.to_rfc3339())
    };
    let suffix = if status.refreshed { ", refreshed" } else { "" };
    format!("access token for {}: {}{}", status.user_id, state, suffix)
}
