use std::io::Read;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use folio_core::language::{self, DEFAULT_LANGUAGE};
use folio_core::models::GithubRequest;
use folio_core::{FolioClient, ReviewView, ReviewWorkspace};

use crate::cli::ReviewArgs;
use crate::config::CliConfig;
use crate::output::{OutputFormat, json::print_json, progress};
use crate::render;

pub async fn run(
    client: &FolioClient,
    config: &CliConfig,
    args: ReviewArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut workspace = match (&args.repo, &args.path) {
        (Some(repo), Some(path)) => fetch_from_github(client, repo, path, args.token.clone()).await?,
        _ => load_local(&args, config)?,
    };
    if let Some(language) = args.language {
        workspace.language = language;
    }
    if !language::is_supported(&workspace.language) {
        tracing::warn!(language = %workspace.language, "Reviewing with an unlisted language");
    }

    let Some(request) = workspace.begin_review() else {
        bail!("Please enter some code to review.");
    };

    let pb = progress::spinner(&format!("Reviewing {} code", request.language));
    let outcome = client.review(&request).await.map_err(|err| err.to_string());
    pb.finish_and_clear();
    workspace.finish_review(outcome);

    let view = workspace.view();
    if let ReviewView::Error(message) = view {
        bail!("{message}");
    }

    if format.is_json() {
        return match view {
            ReviewView::Suggestions(list) => print_json(&list),
            _ => print_json(&serde_json::json!([])),
        };
    }

    println!("{}", render::render_review(&view));
    Ok(())
}

async fn fetch_from_github(
    client: &FolioClient,
    repo: &str,
    path: &str,
    token: Option<String>,
) -> Result<ReviewWorkspace> {
    let mut workspace = ReviewWorkspace::new();
    if workspace.begin_fetch(repo, path) {
        let pb = progress::spinner(&format!("Fetching {path}"));
        let request = GithubRequest {
            repo_url: repo.to_string(),
            file_path: path.to_string(),
            token,
        };
        let outcome = client
            .fetch_github(&request)
            .await
            .map_err(|err| err.to_string());
        pb.finish_and_clear();
        workspace.finish_fetch(path, outcome);
    }

    if let Some(error) = workspace.fetch_error() {
        bail!("{error}");
    }
    eprintln!(
        "{} {} ({})",
        "Fetched".green(),
        path,
        workspace.language.dimmed()
    );
    Ok(workspace)
}

fn load_local(args: &ReviewArgs, config: &CliConfig) -> Result<ReviewWorkspace> {
    let (code, detected) = match &args.file {
        Some(file) => {
            let code = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            (code, language::detect(&file.to_string_lossy()))
        }
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read code from stdin")?;
            (code, None)
        }
    };

    let language = detected
        .map(str::to_string)
        .or_else(|| config.default.language.clone())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    Ok(ReviewWorkspace::new().with_code(code, language))
}
