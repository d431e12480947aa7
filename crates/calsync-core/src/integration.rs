//! OAuth integration record.
//!
//! The record is owned by whatever persists user data. The sync client reads
//! it and is only allowed to replace the access token and its expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Stored OAuth credentials for one user's connected calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationRecord {
    /// Bearer credential for API requests.
    pub access_token: String,

    /// Long-lived credential used to obtain new access tokens.
    pub refresh_token: String,

    /// When `access_token` stops being accepted.
    pub token_expiry: DateTime<Utc>,
}

impl IntegrationRecord {
    /// Creates a new record.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        token_expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_expiry,
        }
    }

    /// Returns when a token issued at `now` for `expires_in_secs` expires.
    ///
    /// A lifetime that does not fit the calendar yields `now`, so the token
    /// counts as expired.
    pub fn expiry_after(now: DateTime<Utc>, expires_in_secs: i64) -> DateTime<Utc> {
        Duration::try_seconds(expires_in_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(now)
    }

    /// Replaces the access token with one valid for `expires_in_secs` from `now`.
    pub fn apply_refresh(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: i64,
        now: DateTime<Utc>,
    ) {
        self.access_token = access_token.into();
        self.token_expiry = Self::expiry_after(now, expires_in_secs);
    }

    /// Returns the time left before the access token expires (negative once past).
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        self.token_expiry - now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, h, m, 0).unwrap()
    }

    #[test]
    fn apply_refresh_replaces_token_and_expiry() {
        let mut record = IntegrationRecord::new("old", "refresh", at(9, 0));
        record.apply_refresh("new", 3600, at(10, 0));

        assert_eq!(record.access_token, "new");
        assert_eq!(record.refresh_token, "refresh");
        assert_eq!(record.token_expiry, at(11, 0));
    }

    #[test]
    fn out_of_range_lifetime_expires_immediately() {
        let mut record = IntegrationRecord::new("old", "refresh", at(9, 0));
        record.apply_refresh("new", i64::MAX, at(10, 0));
        assert_eq!(record.access_token, "new");
        assert_eq!(record.token_expiry, at(10, 0));

        assert_eq!(
            IntegrationRecord::expiry_after(DateTime::<Utc>::MAX_UTC, 60),
            DateTime::<Utc>::MAX_UTC
        );
        assert_eq!(IntegrationRecord::expiry_after(at(10, 0), 1800), at(10, 30));
    }

    #[test]
    fn time_until_expiry_goes_negative() {
        let record = IntegrationRecord::new("a", "r", at(10, 0));
        assert_eq!(record.time_until_expiry(at(9, 30)), Duration::minutes(30));
        assert_eq!(record.time_until_expiry(at(10, 15)), Duration::minutes(-15));
    }

    #[test]
    fn expiry_round_trips_as_rfc3339() {
        let json = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "token_expiry": "2025-03-15T10:00:00Z"
        }"#;
        let record: IntegrationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.token_expiry, at(10, 0));
    }
}
