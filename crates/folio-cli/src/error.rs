use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("gemini_api_key") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Set the provider key before starting the server:");
        eprintln!("  {} export GEMINI_API_KEY=<value>", "$".dimmed());
    }

    if msg.contains("connection refused") || msg.contains("error sending request") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Make sure the Folio server is running:");
        eprintln!("  {} folio-server", "$".dimmed());
    }

    if msg.contains("personal access token") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Pass a token with repo access:");
        eprintln!("  {} folio review --repo <url> --path <file> --token <token>", "$".dimmed());
    }

    std::process::exit(1);
}
