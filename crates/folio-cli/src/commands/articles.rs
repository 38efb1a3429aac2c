use anyhow::Result;
use chrono::{DateTime, Local};
use folio_core::FolioClient;

use crate::output::{OutputFormat, json::print_json, progress, table};

pub async fn run(client: &FolioClient, format: OutputFormat) -> Result<()> {
    let pb = progress::spinner("Loading articles");
    let articles = client.articles().await;
    pb.finish_and_clear();
    let articles = articles?;

    if format.is_json() {
        return print_json(&articles);
    }

    if articles.is_empty() {
        println!("No articles published yet.");
        return Ok(());
    }

    let mut table = table::new_table(["Title", "Published", "Read", "Tags", "URL"]);
    for article in &articles {
        table.add_row([
            article.title.clone(),
            article
                .published_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
            article
                .reading_time_minutes
                .map(|minutes| format!("{minutes} min"))
                .unwrap_or_default(),
            article.tag_list.join(", "),
            article.url.clone(),
        ]);
    }
    table::print_table(table)
}

fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Local).format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
