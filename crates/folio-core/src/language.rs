//! Review languages and file-extension detection.

use serde::Serialize;

pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Selectable review language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub value: &'static str,
    pub label: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { value: "javascript", label: "JavaScript" },
    Language { value: "typescript", label: "TypeScript" },
    Language { value: "python", label: "Python" },
    Language { value: "java", label: "Java" },
    Language { value: "csharp", label: "C#" },
    Language { value: "cpp", label: "C++" },
    Language { value: "c", label: "C" },
    Language { value: "go", label: "Go" },
    Language { value: "rust", label: "Rust" },
    Language { value: "ruby", label: "Ruby" },
    Language { value: "php", label: "PHP" },
    Language { value: "swift", label: "Swift" },
    Language { value: "kotlin", label: "Kotlin" },
    Language { value: "sql", label: "SQL" },
    Language { value: "html", label: "HTML" },
    Language { value: "css", label: "CSS" },
    Language { value: "shell", label: "Shell" },
];

const EXTENSIONS: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("java", "java"),
    ("cs", "csharp"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("go", "go"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("sql", "sql"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("sh", "shell"),
    ("bash", "shell"),
];

/// Whether `value` is one of [`LANGUAGES`]
pub fn is_supported(value: &str) -> bool {
    LANGUAGES.iter().any(|language| language.value == value)
}

/// Guess the review language from a file path's extension.
pub fn detect(file_path: &str) -> Option<&'static str> {
    let file_name = file_path.rsplit('/').next().unwrap_or(file_path);
    let (_, extension) = file_name.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();

    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, value)| *value)
        .filter(|value| is_supported(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect("src/lib.rs"), Some("rust"));
        assert_eq!(detect("app/Page.TSX"), Some("typescript"));
        assert_eq!(detect("scripts/deploy.sh"), Some("shell"));
    }

    #[test]
    fn test_detect_unknown_or_missing_extension() {
        assert_eq!(detect("Makefile"), None);
        assert_eq!(detect("notes.txt"), None);
        assert_eq!(detect("dir.v2/README"), None);
    }

    #[test]
    fn test_every_mapping_targets_a_listed_language() {
        for (_, value) in EXTENSIONS {
            assert!(is_supported(value), "{value} missing from LANGUAGES");
        }
        assert!(is_supported(DEFAULT_LANGUAGE));
    }
}
