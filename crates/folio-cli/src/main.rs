mod cli;
mod clipboard;
mod commands;
mod config;
mod error;
mod output;
mod render;

use anyhow::Result;
use clap::Parser;
use cli::{ChatArgs, Cli, Commands};
use folio_core::FolioClient;
use folio_core::client::DEFAULT_SERVER_URL;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error::handle_error(err);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::CliConfig::load();

    // Logs go to a file so they never interleave with streamed replies.
    let _guard = init_logging(cli.verbose)?;

    let server = cli
        .server
        .clone()
        .or_else(|| config.server.url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    tracing::debug!(server = %server, "Starting folio");
    let client = FolioClient::new(server);
    let format = cli.format;

    match cli.command.unwrap_or(Commands::Chat(ChatArgs::default())) {
        Commands::Chat(args) => commands::chat::run(client, &config, args).await,
        Commands::Models => commands::models::run(&client, format).await,
        Commands::Review(args) => commands::review::run(&client, &config, args, format).await,
        Commands::Articles => commands::articles::run(&client, format).await,
        Commands::Site => commands::site::run(&client, format).await,
        Commands::Status => commands::status::run(&client, format).await,
    }
}

fn init_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("folio")
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "folio.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    Ok(guard)
}
