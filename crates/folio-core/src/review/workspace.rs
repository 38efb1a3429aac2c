use crate::language::{self, DEFAULT_LANGUAGE};
use crate::models::{ReviewRequest, ReviewSuggestion};

/// What the review panel should show
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewView<'a> {
    /// Nothing submitted yet
    Welcome,
    Loading,
    Error(&'a str),
    /// The review succeeded with an empty result
    NoIssues,
    /// Findings, most severe first, then by line
    Suggestions(Vec<&'a ReviewSuggestion>),
}

/// Editor and result state of the code reviewer.
#[derive(Debug, Clone)]
pub struct ReviewWorkspace {
    pub code: String,
    pub language: String,
    result: Option<Vec<ReviewSuggestion>>,
    error: Option<String>,
    fetch_error: Option<String>,
    reviewing: bool,
    fetching: bool,
}

impl Default for ReviewWorkspace {
    fn default() -> Self {
        Self {
            code: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            result: None,
            error: None,
            fetch_error: None,
            reviewing: false,
            fetching: false,
        }
    }
}

impl ReviewWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: impl Into<String>, language: impl Into<String>) -> Self {
        self.code = code.into();
        self.language = language.into();
        self
    }

    pub fn is_busy(&self) -> bool {
        self.reviewing || self.fetching
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Start a review. Returns the request to send, or `None` if the editor is empty.
    pub fn begin_review(&mut self) -> Option<ReviewRequest> {
        if self.code.trim().is_empty() {
            self.error = Some("Please enter some code to review.".to_string());
            return None;
        }

        self.reviewing = true;
        self.error = None;
        self.result = None;
        Some(ReviewRequest {
            code: self.code.clone(),
            language: self.language.clone(),
        })
    }

    pub fn finish_review(&mut self, outcome: Result<Vec<ReviewSuggestion>, String>) {
        self.reviewing = false;
        match outcome {
            Ok(suggestions) => self.result = Some(suggestions),
            Err(message) => self.error = Some(message),
        }
    }

    /// Start loading a file from a repository. The editor is left untouched until
    /// the fetch succeeds.
    pub fn begin_fetch(&mut self, repo_url: &str, file_path: &str) -> bool {
        if repo_url.trim().is_empty() || file_path.trim().is_empty() {
            self.fetch_error = Some("Repository URL and File Path are required.".to_string());
            return false;
        }

        self.fetching = true;
        self.fetch_error = None;
        self.error = None;
        self.result = None;
        true
    }

    /// Apply a fetch result. On success the language follows the file extension
    /// when it is a known one.
    pub fn finish_fetch(&mut self, file_path: &str, outcome: Result<String, String>) {
        self.fetching = false;
        match outcome {
            Ok(code) => {
                self.code = code;
                if let Some(detected) = language::detect(file_path) {
                    self.language = detected.to_string();
                }
            }
            Err(message) => self.fetch_error = Some(message),
        }
    }

    pub fn view(&self) -> ReviewView<'_> {
        if self.reviewing {
            return ReviewView::Loading;
        }
        if let Some(error) = self.error.as_deref() {
            return ReviewView::Error(error);
        }
        match self.result.as_deref() {
            None => ReviewView::Welcome,
            Some([]) => ReviewView::NoIssues,
            Some(suggestions) => {
                let mut sorted: Vec<&ReviewSuggestion> = suggestions.iter().collect();
                sorted.sort_by_key(|s| (s.severity, s.line));
                ReviewView::Suggestions(sorted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn finding(line: u32, severity: Severity) -> ReviewSuggestion {
        ReviewSuggestion {
            line,
            severity,
            suggestion: format!("fix line {line}"),
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn test_empty_editor_is_rejected() {
        let mut workspace = ReviewWorkspace::new();
        assert!(workspace.begin_review().is_none());
        assert_eq!(
            workspace.view(),
            ReviewView::Error("Please enter some code to review.")
        );
    }

    #[test]
    fn test_empty_result_is_no_issues() {
        let mut workspace = ReviewWorkspace::new().with_code("x = 1", "python");
        assert_eq!(workspace.view(), ReviewView::Welcome);

        let request = workspace.begin_review().unwrap();
        assert_eq!(request.language, "python");
        assert_eq!(workspace.view(), ReviewView::Loading);

        workspace.finish_review(Ok(Vec::new()));
        assert_eq!(workspace.view(), ReviewView::NoIssues);
    }

    #[test]
    fn test_suggestions_sorted_by_severity_then_line() {
        let mut workspace = ReviewWorkspace::new().with_code("code", "rust");
        workspace.begin_review();
        workspace.finish_review(Ok(vec![
            finding(9, Severity::Low),
            finding(7, Severity::Critical),
            finding(2, Severity::Low),
        ]));

        let ReviewView::Suggestions(list) = workspace.view() else {
            panic!("expected suggestions");
        };
        let order: Vec<(Severity, u32)> = list.iter().map(|s| (s.severity, s.line)).collect();
        assert_eq!(
            order,
            vec![
                (Severity::Critical, 7),
                (Severity::Low, 2),
                (Severity::Low, 9)
            ]
        );
    }

    #[test]
    fn test_failed_fetch_keeps_editor_content() {
        let mut workspace = ReviewWorkspace::new().with_code("original", "javascript");
        assert!(workspace.begin_fetch("https://github.com/o/r", "missing.py"));
        workspace.finish_fetch(
            "missing.py",
            Err("File not found. Please check the repository URL and file path. (Not Found)"
                .to_string()),
        );

        assert_eq!(workspace.code, "original");
        assert_eq!(workspace.language, "javascript");
        assert!(workspace.fetch_error().unwrap().contains("not found"));
        assert!(!workspace.is_busy());
    }

    #[test]
    fn test_successful_fetch_detects_language() {
        let mut workspace = ReviewWorkspace::new();
        assert!(workspace.begin_fetch("https://github.com/o/r", "src/main.rs"));
        workspace.finish_fetch("src/main.rs", Ok("fn main() {}".to_string()));

        assert_eq!(workspace.code, "fn main() {}");
        assert_eq!(workspace.language, "rust");
        assert!(workspace.fetch_error().is_none());
    }

    #[test]
    fn test_fetch_requires_both_fields() {
        let mut workspace = ReviewWorkspace::new().with_code("keep", "go");
        assert!(!workspace.begin_fetch("", "a.go"));
        assert_eq!(
            workspace.fetch_error(),
            Some("Repository URL and File Path are required.")
        );
        assert_eq!(workspace.code, "keep");
    }
}
