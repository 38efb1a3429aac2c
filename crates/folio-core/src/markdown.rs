//! Line-oriented markdown formatter for streamed assistant replies.
//!
//! [`parse`] is a pure function over the whole accumulated buffer. It is re-run on
//! every chunk, so it must not carry state between calls.
//!
//! Each line is matched against the rules below, first match wins:
//!
//! 1. a fence line (three backticks, optional language) toggles code mode
//! 2. a line wrapped in `**` is a level 3 heading
//! 3. `# `, `## `, `### ` headings
//! 4. `- ` bullets
//! 5. `<digits>.` numbered items
//! 6. `> ` quotes
//! 7. lines containing a backtick become inline-code paragraphs
//! 8. other non-blank lines become paragraphs with `**bold**` spans
//! 9. blank lines become spacers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const FENCE: &str = "```";
const DEFAULT_CODE_LABEL: &str = "code";

static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s*(.*)$").expect("numbered list pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));

/// Display element produced by the formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Closed fenced block. `language` is the fence tag, or `code` when absent.
    CodeBlock { language: String, content: String },
    Heading { level: u8, text: String },
    Bullet { text: String },
    Numbered { number: String, text: String },
    Quote { text: String },
    Paragraph { spans: Vec<Span> },
    Spacer,
}

/// Inline run inside a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Code(String),
    Bold(String),
}

struct OpenFence {
    language: String,
    content: String,
}

/// Format `content` into display nodes.
///
/// A fence that is still open at the end of the buffer produces nothing; the block
/// appears once its closing fence has streamed in.
pub fn parse(content: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut fence: Option<OpenFence> = None;

    for line in content.split('\n') {
        if line.starts_with(FENCE) {
            match fence.take() {
                Some(open) => nodes.push(Node::CodeBlock {
                    language: if open.language.is_empty() {
                        DEFAULT_CODE_LABEL.to_string()
                    } else {
                        open.language
                    },
                    content: open.content,
                }),
                None => {
                    fence = Some(OpenFence {
                        language: line[FENCE.len()..].trim().to_string(),
                        content: String::new(),
                    })
                }
            }
            continue;
        }

        if let Some(open) = fence.as_mut() {
            open.content.push_str(line);
            open.content.push('\n');
            continue;
        }

        nodes.push(parse_line(line));
    }

    nodes
}

fn parse_line(line: &str) -> Node {
    if line.starts_with("**") && line.ends_with("**") {
        return Node::Heading {
            level: 3,
            text: line.replace("**", ""),
        };
    }

    for (prefix, level) in [("# ", 1), ("## ", 2), ("### ", 3)] {
        if let Some(text) = line.strip_prefix(prefix) {
            return Node::Heading {
                level,
                text: text.to_string(),
            };
        }
    }

    if let Some(text) = line.strip_prefix("- ") {
        return Node::Bullet {
            text: text.to_string(),
        };
    }

    if let Some(captures) = NUMBERED.captures(line) {
        return Node::Numbered {
            number: captures[1].to_string(),
            text: captures[2].to_string(),
        };
    }

    if let Some(text) = line.strip_prefix("> ") {
        return Node::Quote {
            text: text.to_string(),
        };
    }

    if line.contains('`') {
        return Node::Paragraph {
            spans: inline_code_spans(line),
        };
    }

    if !line.trim().is_empty() {
        return Node::Paragraph {
            spans: bold_spans(line),
        };
    }

    Node::Spacer
}

/// Split on backticks; odd segments are code.
fn inline_code_spans(line: &str) -> Vec<Span> {
    line.split('`')
        .enumerate()
        .filter_map(|(i, part)| {
            if i % 2 == 1 {
                Some(Span::Code(part.to_string()))
            } else if part.is_empty() {
                None
            } else {
                Some(Span::Text(part.to_string()))
            }
        })
        .collect()
}

fn bold_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for captures in BOLD.captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::Text(line[last..whole.start()].to_string()));
        }
        spans.push(Span::Bold(captures[1].to_string()));
        last = whole.end();
    }

    if last < line.len() {
        spans.push(Span::Text(line[last..].to_string()));
    }

    spans
}

/// Raw source of every closed code block, in order. Used for copy actions.
pub fn code_blocks(nodes: &[Node]) -> Vec<&str> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::CodeBlock { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    #[test]
    fn test_fenced_block_round_trip() {
        let nodes = parse("```py\nx=1\n```");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                language: "py".to_string(),
                content: "x=1\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_fence_without_language_is_labelled_code() {
        let nodes = parse("```\nls -la\n\ncd /\n```");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                language: "code".to_string(),
                content: "ls -la\n\ncd /\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_unclosed_fence_emits_nothing_yet() {
        let nodes = parse("Intro\n```rust\nfn main() {");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                spans: vec![text("Intro")]
            }]
        );
    }

    #[test]
    fn test_lines_inside_fence_are_verbatim() {
        let nodes = parse("```md\n# not a heading\n- not a bullet\n```");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                language: "md".to_string(),
                content: "# not a heading\n- not a bullet\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_bold_inside_paragraph() {
        let nodes = parse("**Hi** there");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                spans: vec![Span::Bold("Hi".to_string()), text(" there")]
            }]
        );
    }

    #[test]
    fn test_multiple_bold_spans_keep_order() {
        let nodes = parse("a **b** c **d**e");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                spans: vec![
                    text("a "),
                    Span::Bold("b".to_string()),
                    text(" c "),
                    Span::Bold("d".to_string()),
                    text("e"),
                ]
            }]
        );
    }

    #[test]
    fn test_line_wrapped_in_bold_is_heading() {
        assert_eq!(
            parse("**Summary**"),
            vec![Node::Heading {
                level: 3,
                text: "Summary".to_string()
            }]
        );
    }

    #[test]
    fn test_hash_headings_by_level() {
        let nodes = parse("# One\n## Two\n### Three");
        assert_eq!(
            nodes,
            vec![
                Node::Heading {
                    level: 1,
                    text: "One".to_string()
                },
                Node::Heading {
                    level: 2,
                    text: "Two".to_string()
                },
                Node::Heading {
                    level: 3,
                    text: "Three".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_ordered_item_extracts_number() {
        assert_eq!(
            parse("3. Buy milk"),
            vec![Node::Numbered {
                number: "3".to_string(),
                text: "Buy milk".to_string()
            }]
        );
    }

    #[test]
    fn test_ordered_item_without_space() {
        assert_eq!(
            parse("12.Done"),
            vec![Node::Numbered {
                number: "12".to_string(),
                text: "Done".to_string()
            }]
        );
    }

    #[test]
    fn test_bullet_and_quote() {
        let nodes = parse("- item `x`\n> quoted");
        assert_eq!(
            nodes,
            vec![
                Node::Bullet {
                    text: "item `x`".to_string()
                },
                Node::Quote {
                    text: "quoted".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_inline_code_alternates_spans() {
        let nodes = parse("Run `cargo test` then `ls`");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                spans: vec![
                    text("Run "),
                    Span::Code("cargo test".to_string()),
                    text(" then "),
                    Span::Code("ls".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn test_inline_code_wins_over_bold() {
        let nodes = parse("**bold** and `code`");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                spans: vec![
                    text("**bold** and "),
                    Span::Code("code".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn test_blank_lines_are_spacers() {
        let nodes = parse("a\n\n   \nb");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[1], Node::Spacer);
        assert_eq!(nodes[2], Node::Spacer);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let buffer = "# Title\n\nSome **bold** text\n```rs\nlet x = 1;\n```\n1. one\n- two\n> three";
        assert_eq!(parse(buffer), parse(buffer));
    }

    #[test]
    fn test_code_blocks_lists_sources() {
        let nodes = parse("```a\n1\n```\ntext\n```b\n2\n```");
        assert_eq!(code_blocks(&nodes), vec!["1\n", "2\n"]);
    }
}
