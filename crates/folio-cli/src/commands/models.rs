use anyhow::Result;
use folio_core::FolioClient;

use crate::output::{OutputFormat, json::print_json, progress, table};

pub async fn run(client: &FolioClient, format: OutputFormat) -> Result<()> {
    let pb = progress::spinner("Loading models");
    let models = client.list_models().await;
    pb.finish_and_clear();
    let models = models?;

    if format.is_json() {
        return print_json(&models);
    }

    let mut table = table::new_table(["Model", "Name", "Input tokens", "Output tokens"]);
    for model in &models {
        table.add_row([
            model
                .name
                .strip_prefix("models/")
                .unwrap_or(&model.name)
                .to_string(),
            model.display_name.clone(),
            model.input_token_limit.to_string(),
            model.output_token_limit.to_string(),
        ]);
    }
    table::print_table(table)
}
