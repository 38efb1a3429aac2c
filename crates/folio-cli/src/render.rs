//! Terminal rendering of formatter nodes and review results.

use colored::{ColoredString, Colorize};
use folio_core::models::{ReviewSuggestion, Severity};
use folio_core::{Node, ReviewView, Span};

/// Render one node as terminal text, without a trailing newline.
pub fn render_node(node: &Node) -> String {
    match node {
        Node::CodeBlock { language, content } => {
            let mut out = format!("{}", format!("┌─ {language}").dimmed());
            for line in content.lines() {
                out.push('\n');
                out.push_str(&format!("{} {}", "│".dimmed(), line.cyan()));
            }
            out.push('\n');
            out.push_str(&format!("{}", "└─".dimmed()));
            out
        }
        Node::Heading { level: 1, text } => text.bold().underline().to_string(),
        Node::Heading { level: 2, text } => text.bold().to_string(),
        Node::Heading { text, .. } => text.bold().yellow().to_string(),
        Node::Bullet { text } => format!("  • {}", render_inline(text)),
        Node::Numbered { number, text } => format!("  {number}. {}", render_inline(text)),
        Node::Quote { text } => format!("{} {}", "│".dimmed(), text.italic()),
        Node::Paragraph { spans } => spans.iter().map(render_span).collect(),
        Node::Spacer => String::new(),
    }
}

fn render_span(span: &Span) -> String {
    match span {
        Span::Text(text) => text.clone(),
        Span::Code(code) => code.cyan().to_string(),
        Span::Bold(text) => text.bold().to_string(),
    }
}

/// List items keep their `**bold**` markers in the node text.
fn render_inline(text: &str) -> String {
    match folio_core::markdown::parse(text).as_slice() {
        [Node::Paragraph { spans }] => spans.iter().map(render_span).collect(),
        _ => text.to_string(),
    }
}

/// Prints nodes once they can no longer change while a reply streams in.
///
/// Every node but the last is final after a re-parse, so only the tail is held
/// back until the stream ends.
#[derive(Debug, Default)]
pub struct StreamPrinter {
    printed: usize,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered lines for the nodes that became final since the last call.
    pub fn advance(&mut self, nodes: &[Node]) -> Vec<String> {
        let stable = nodes.len().saturating_sub(1);
        self.take(nodes, stable)
    }

    /// Rendered lines for everything not printed yet.
    pub fn finish(&mut self, nodes: &[Node]) -> Vec<String> {
        self.take(nodes, nodes.len())
    }

    fn take(&mut self, nodes: &[Node], upto: usize) -> Vec<String> {
        if upto <= self.printed {
            return Vec::new();
        }
        let lines = nodes[self.printed..upto].iter().map(render_node).collect();
        self.printed = upto;
        lines
    }
}

pub fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity);
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
        Severity::Info => label.dimmed(),
    }
}

fn render_suggestion(suggestion: &ReviewSuggestion) -> String {
    let mut out = format!(
        "{} line {}: {}",
        severity_label(suggestion.severity),
        suggestion.line,
        suggestion.suggestion.bold()
    );
    for line in suggestion.explanation.lines() {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

pub fn render_review(view: &ReviewView<'_>) -> String {
    match view {
        ReviewView::Welcome => "Nothing reviewed yet.".dimmed().to_string(),
        ReviewView::Loading => "Reviewing...".dimmed().to_string(),
        ReviewView::Error(message) => format!("{} {}", "Error:".red().bold(), message),
        ReviewView::NoIssues => format!("{} No issues found.", "✓".green().bold()),
        ReviewView::Suggestions(list) => list
            .iter()
            .map(|s| render_suggestion(s))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
