//! Almanac CLI
//!
//! Terminal assistant for live weather lookups and PDF-grounded
//! question answering.

use almanac_core::error::exit_codes;
use almanac_core::{Agent, AgentConfig, AlmanacError};
use anyhow::Result;
use clap::Parser;

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AgentConfig::from_env();
    if cli.llm_api_key.is_some() {
        config.llm.api_key = cli.llm_api_key.clone();
    }
    if cli.weather_api_key.is_some() {
        config.weather.api_key = cli.weather_api_key.clone();
    }
    if cli.no_strict_grounding {
        config.retrieval.strict_grounding = false;
    }

    let agent = Agent::new(config)?;

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &agent, cli.verbose).await,
        Commands::Chat(args) => commands::chat::run(args, &agent, cli.verbose).await,
    }
}

/// Map domain errors to process exit codes; anything else is a general
/// failure.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<AlmanacError>()
        .map(AlmanacError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
