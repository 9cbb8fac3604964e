//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "almanac")]
#[command(
    author,
    version,
    about = "Ask about the weather or question your PDF documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// LLM gateway API key
    #[arg(long, global = true, env = "ALMANAC_LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// OpenWeatherMap API key
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,

    /// Disable the relevance guard that refuses off-topic document questions
    #[arg(long, global = true)]
    pub no_strict_grounding: bool,

    /// Verbose output (shows routing decisions)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and exit
    Ask(AskArgs),

    /// Interactive chat session
    Chat(ChatArgs),
}

#[derive(Args)]
pub struct AskArgs {
    /// The question to ask
    pub query: Vec<String>,

    /// PDF document to load before answering
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}

#[derive(Args)]
pub struct ChatArgs {
    /// PDF document to load at startup
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}
