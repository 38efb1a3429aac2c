use anyhow::Result;
use folio_core::FolioClient;

use crate::output::{OutputFormat, json::print_json, table};

pub async fn run(client: &FolioClient, format: OutputFormat) -> Result<()> {
    let features = client.site().await?;

    if format.is_json() {
        return print_json(&features);
    }

    let mut table = table::new_table(["Tool", "Description", "Path"]);
    for feature in &features {
        table.add_row([&feature.title, &feature.description, &feature.href]);
    }
    table::print_table(table)
}
