//! calsync CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use calsync_client::cli::{Cli, Command, ConfigAction};
use calsync_client::commands;
use calsync_client::config::ClientConfig;
use calsync_client::error::{ClientError, ClientResult};
use calsync_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::cli(cli.debug)) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .map_err(ClientError::Config)?;

    let Cli {
        user, json, command, ..
    } = cli;

    match command {
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config),
        },
        Command::Create { event } => {
            let user_id = config.user_id(user.as_deref()).map_err(ClientError::Config)?;
            let sync = commands::connect(&config)?;
            commands::events::create(&sync, &user_id, event.into_event(), json).await
        }
        Command::Update { event_id, event } => {
            let user_id = config.user_id(user.as_deref()).map_err(ClientError::Config)?;
            let sync = commands::connect(&config)?;
            commands::events::update(&sync, &user_id, &event_id, event.into_event(), json).await
        }
        Command::Delete { event_id } => {
            let user_id = config.user_id(user.as_deref()).map_err(ClientError::Config)?;
            let sync = commands::connect(&config)?;
            commands::events::delete(&sync, &user_id, &event_id, json).await
        }
        Command::Token => {
            let user_id = config.user_id(user.as_deref()).map_err(ClientError::Config)?;
            let sync = commands::connect(&config)?;
            commands::token::show(&sync, &user_id, json).await
        }
    }
}
