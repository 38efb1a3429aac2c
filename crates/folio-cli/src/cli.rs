use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Folio - AI chat, code review and blog from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Folio server URL (defaults to http://127.0.0.1:3000)
    #[arg(long, global = true, env = "FOLIO_SERVER_URL")]
    pub server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with a model (interactive unless a message is given)
    Chat(ChatArgs),

    /// List models that support text generation
    Models,

    /// Review a local file, stdin or a GitHub file
    Review(ReviewArgs),

    /// List blog articles
    Articles,

    /// Show the tools this site offers
    Site,

    /// Check that the server is reachable
    Status,
}

#[derive(Args, Default)]
pub struct ChatArgs {
    /// Send a single message and exit
    pub message: Option<String>,

    /// Model to chat with
    #[arg(short, long, env = "FOLIO_MODEL")]
    pub model: Option<String>,
}

#[derive(Args)]
pub struct ReviewArgs {
    /// File to review; reads stdin when omitted and no repository is given
    pub file: Option<PathBuf>,

    /// Review language (detected from the file extension when possible)
    #[arg(short, long)]
    pub language: Option<String>,

    /// GitHub repository URL to fetch the file from
    #[arg(long, requires = "path")]
    pub repo: Option<String>,

    /// File path inside the repository
    #[arg(long, requires = "repo")]
    pub path: Option<String>,

    /// Personal access token for private repositories
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
