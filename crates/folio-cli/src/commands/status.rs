use anyhow::{Result, bail};
use colored::Colorize;
use folio_core::FolioClient;

use crate::output::{OutputFormat, json::print_json};

pub async fn run(client: &FolioClient, format: OutputFormat) -> Result<()> {
    let healthy = client.health().await;

    if format.is_json() {
        print_json(&serde_json::json!({
            "server": client.base_url(),
            "healthy": healthy,
        }))?;
    } else if healthy {
        println!("{} {}", "●".green(), client.base_url());
    } else {
        println!("{} {}", "●".red(), client.base_url());
    }

    if !healthy {
        bail!("Folio server at {} is not reachable (connection refused?)", client.base_url());
    }
    Ok(())
}
