//! Code review: prompt construction, output schema and result validation.

mod workspace;

pub use workspace::{ReviewView, ReviewWorkspace};

use serde_json::{Value, json};
use thiserror::Error;

use crate::models::{ReviewSuggestion, Severity};

/// Sampling temperature for review calls; low for consistent findings.
pub const REVIEW_TEMPERATURE: f32 = 0.2;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Missing code or language in request body")]
    MissingInput,

    #[error("Review output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build the reviewer prompt for `code` written in `language`.
pub fn build_prompt(code: &str, language: &str) -> String {
    format!(
        "Act as an expert senior software engineer and meticulous code reviewer.\n\
         Thoroughly analyze the following {language} code snippet.\n\
         Your task is to identify potential bugs, performance bottlenecks, security vulnerabilities, code smells, and deviations from established best practices.\n\
         For each issue you find, provide a constructive, clear, and actionable feedback.\n\
         Focus exclusively on areas that need improvement. Do not comment on code that is well-written.\n\
         If the code is exemplary and has no issues, return an empty array.\n\
         \n\
         Here is the code to review:\n\
         ```{language}\n\
         {code}\n\
         ```\n"
    )
}

/// Response schema: an array of findings, every field required.
pub fn response_schema() -> Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "line": {
                    "type": "INTEGER",
                    "description": "The line number in the code where the issue is located. Be as accurate as possible. If the issue spans multiple lines, pick the starting line."
                },
                "severity": {
                    "type": "STRING",
                    "description": "The severity of the issue. Must be one of: 'Critical', 'High', 'Medium', 'Low', 'Info'.",
                    "enum": severities
                },
                "suggestion": {
                    "type": "STRING",
                    "description": "A brief, one-sentence summary of the suggested improvement. This should be a direct recommendation."
                },
                "explanation": {
                    "type": "STRING",
                    "description": "A detailed explanation of why this is an issue and how the suggestion improves the code. Be clear and educational."
                }
            },
            "required": ["line", "severity", "suggestion", "explanation"]
        }
    })
}

/// Validate provider output against the finding schema.
///
/// Empty output means no findings. Anything else must be a JSON array of
/// well-formed findings; no repair is attempted.
pub fn parse_suggestions(text: &str) -> Result<Vec<ReviewSuggestion>, ReviewError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Reject requests missing either field before any provider call.
pub fn validate_input(code: &str, language: &str) -> Result<(), ReviewError> {
    if code.trim().is_empty() || language.trim().is_empty() {
        return Err(ReviewError::MissingInput);
    }
    Ok(())
}
