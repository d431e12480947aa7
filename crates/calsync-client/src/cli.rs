//! Command-line interface definition.

use std::path::PathBuf;

use calsync_core::{CalendarEvent, EventDateTime};
use clap::{Args, Parser, Subcommand};

/// calsync - Push interview events to a connected calendar
#[derive(Debug, Parser)]
#[command(name = "calsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// User whose calendar integration is used (overrides `user_id`)
    #[arg(long, short, env = "CALSYNC_USER")]
    pub user: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an event
    Create {
        #[command(flatten)]
        event: EventArgs,
    },

    /// Replace an existing event
    Update {
        /// Provider id of the event
        event_id: String,

        #[command(flatten)]
        event: EventArgs,
    },

    /// Delete an event (succeeds if it is already gone)
    Delete {
        /// Provider id of the event
        event_id: String,
    },

    /// Show the access token state, refreshing it if needed
    Token,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Event fields shared by `create` and `update`.
#[derive(Debug, Clone, Args)]
pub struct EventArgs {
    /// Event title
    #[arg(long)]
    pub summary: String,

    /// Start, e.g. 2025-03-15T10:00:00
    #[arg(long)]
    pub start: String,

    /// End, e.g. 2025-03-15T11:00:00
    #[arg(long)]
    pub end: String,

    /// IANA time zone of start and end
    #[arg(long, default_value = "UTC")]
    pub time_zone: String,

    /// Event description
    #[arg(long)]
    pub description: Option<String>,

    /// Event location or meeting link
    #[arg(long)]
    pub location: Option<String>,
}

impl EventArgs {
    /// Builds the event to send.
    pub fn into_event(self) -> CalendarEvent {
        let mut event = CalendarEvent::new(
            self.summary,
            EventDateTime::new(self.start, self.time_zone.clone()),
            EventDateTime::new(self.end, self.time_zone),
        );
        if let Some(description) = self.description {
            event = event.with_description(description);
        }
        if let Some(location) = self.location {
            event = event.with_location(location);
        }
        event
    }
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration (inline secrets masked)
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
