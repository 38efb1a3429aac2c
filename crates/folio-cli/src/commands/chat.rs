use std::future::Future;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use folio_core::chat::{ChatSession, CopyTarget, CopyTracker, TurnState, format_elapsed};
use folio_core::markdown;
use folio_core::{ChatError, FolioClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::cli::ChatArgs;
use crate::clipboard::Osc52Clipboard;
use crate::config::CliConfig;
use crate::output::progress;
use crate::render::StreamPrinter;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub async fn run(client: FolioClient, config: &CliConfig, args: ChatArgs) -> Result<()> {
    let model = args
        .model
        .or_else(|| config.default.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let mut session = ChatSession::new(client.clone()).with_model(model);

    if let Some(message) = args.message {
        let outcome = run_turn(&mut session, &message).await?;
        if outcome == TurnState::Failed {
            anyhow::bail!("The reply failed; see the log for provider details");
        }
        return Ok(());
    }

    print_banner(&session);
    let mut copies = CopyTracker::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();
        let Some(line) = next_input(&mut lines, ctrl_c()).await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ').unwrap_or((input, "")) {
            ("/exit" | "/quit", _) => break,
            ("/help", _) => print_help(),
            ("/model", "") => println!(
                "Current model: {}",
                session.model().unwrap_or("none").bold()
            ),
            ("/model", name) => {
                session.set_model(name.trim());
                println!("Switched to {}", name.trim().bold());
            }
            ("/models", _) => match client.list_models().await {
                Ok(models) => {
                    for model in models {
                        println!("  {} {}", model.name.cyan(), model.display_name.dimmed());
                    }
                }
                Err(err) => println!("{} {}", "Error:".red().bold(), err),
            },
            ("/copy", arg) => copy_reply(&session, &mut copies, arg.trim()),
            _ => {
                run_turn(&mut session, input).await?;
            }
        }
    }

    Ok(())
}

/// Next prompt line, or `None` on end of input or when `interrupt` fires first.
async fn next_input<R>(
    lines: &mut Lines<R>,
    interrupt: impl Future<Output = ()>,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        line = lines.next_line() => line,
        _ = interrupt => Ok(None),
    }
}

async fn ctrl_c() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn run_turn(session: &mut ChatSession<FolioClient>, input: &str) -> Result<TurnState> {
    let handle = match session.begin_turn(input) {
        Ok(handle) => handle,
        Err(err @ (ChatError::EmptyMessage | ChatError::NoModel)) => {
            println!("{} {}", "Error:".red().bold(), err);
            return Ok(TurnState::Idle);
        }
        Err(err) => return Err(err.into()),
    };

    // Ctrl-C stops the reply instead of the program while a turn is in flight.
    let interrupt = tokio::spawn({
        let handle = handle.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.abort();
            }
        }
    });

    let pb = progress::spinner("Thinking");
    let mut printer = StreamPrinter::new();
    let mut last_nodes = Vec::new();

    let outcome = session
        .stream_response(|update| {
            if !pb.is_finished() {
                pb.finish_and_clear();
                println!();
            }
            for line in printer.advance(&update.nodes) {
                println!("{line}");
            }
            last_nodes = update.nodes;
        })
        .await;
    interrupt.abort();
    pb.finish_and_clear();
    let outcome = outcome?;

    for line in printer.finish(&last_nodes) {
        println!("{line}");
    }

    let elapsed = format_elapsed(session.stopwatch().elapsed());
    match outcome {
        TurnState::Aborted => println!("{} {}", "■ stopped".yellow(), elapsed.dimmed()),
        TurnState::Failed => {
            if let Some(message) = session.transcript().last() {
                println!("{} {}", message.text.red(), elapsed.dimmed());
            }
        }
        _ => println!("{}", elapsed.dimmed()),
    }
    println!();
    debug!(outcome = ?outcome, "Turn rendered");
    Ok(outcome)
}

/// `/copy` copies the last reply, `/copy N` its N-th code block (1-based).
fn copy_reply(session: &ChatSession<FolioClient>, copies: &mut CopyTracker, arg: &str) {
    let transcript = session.transcript();
    let Some(index) = transcript
        .messages()
        .iter()
        .rposition(|message| !message.is_user() && !message.is_error)
    else {
        println!("Nothing to copy yet.");
        return;
    };
    let Some(message) = transcript.get(index) else {
        return;
    };

    let (target, text) = if arg.is_empty() {
        (CopyTarget::Message(index), message.text.clone())
    } else {
        let nodes = markdown::parse(&message.text);
        let blocks = markdown::code_blocks(&nodes);
        let Some((block, content)) = arg
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| blocks.get(i).map(|content| (i, content.to_string())))
        else {
            println!("No code block {arg} in the last reply ({} found).", blocks.len());
            return;
        };
        (
            CopyTarget::CodeBlock {
                message: index,
                block,
            },
            content,
        )
    };

    let now = Instant::now();
    copies.expire(now);
    if copies.copy(&Osc52Clipboard, target, &text, now) && copies.is_copied(target, now) {
        println!("{}", "✓ Copied".green());
    } else {
        println!("{}", "Copy failed".red());
    }
}

fn print_banner(session: &ChatSession<FolioClient>) {
    println!(
        "{} {}",
        "Folio chat".bold(),
        format!("({})", session.model().unwrap_or("no model")).dimmed()
    );
    println!("{}", "Type /help for commands, Ctrl-C stops a reply.".dimmed());
    println!();
}

fn print_help() {
    println!("  /model [name]  show or switch the model");
    println!("  /models        list available models");
    println!("  /copy [n]      copy the last reply, or its n-th code block");
    println!("  /exit          leave the chat");
}

fn prompt() {
    use std::io::Write;
    print!("{} ", "›".cyan().bold());
    let _ = std::io::stdout().flush();
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_input_reads_lines_until_eof() {
        let mut lines = BufReader::new(&b"hello\n/exit\n"[..]).lines();

        let first = next_input(&mut lines, std::future::pending()).await.unwrap();
        assert_eq!(first.as_deref(), Some("hello"));
        let second = next_input(&mut lines, std::future::pending()).await.unwrap();
        assert_eq!(second.as_deref(), Some("/exit"));
        assert!(next_input(&mut lines, std::future::pending()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_interrupt_at_prompt_ends_input() {
        // A reader that never produces a line, like an idle terminal.
        let (_writer, reader) = tokio::io::duplex(64);
        let mut lines = BufReader::new(reader).lines();

        let input = next_input(&mut lines, std::future::ready(())).await.unwrap();
        assert!(input.is_none());
    }
}
