//! Calendar event value type.
//!
//! A [`CalendarEvent`] describes one interview slot as the caller wants it to
//! appear on the remote calendar. Nothing here validates time ordering or
//! zone names: the caller's values are passed to the provider verbatim.

use serde::{Deserialize, Serialize};

/// A point in time as understood by the calendar provider.
///
/// Both fields are opaque strings: `date_time` is an ISO-8601 timestamp and
/// `time_zone` an IANA zone name such as `Europe/Paris`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// ISO-8601 date-time string.
    pub date_time: String,
    /// IANA time zone name.
    pub time_zone: String,
}

impl EventDateTime {
    /// Creates a new event time.
    pub fn new(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            date_time: date_time.into(),
            time_zone: time_zone.into(),
        }
    }
}

/// An event to create or update on the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Provider-assigned identifier. Absent until the event has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Short title.
    pub summary: String,

    /// Free text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Physical address or meeting URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Start of the event.
    pub start: EventDateTime,

    /// End of the event.
    pub end: EventDateTime,
}

impl CalendarEvent {
    /// Creates a new event without an id, description or location.
    pub fn new(summary: impl Into<String>, start: EventDateTime, end: EventDateTime) -> Self {
        Self {
            id: None,
            summary: summary.into(),
            description: None,
            location: None,
            start,
            end,
        }
    }

    /// Builder method to set the provider id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
