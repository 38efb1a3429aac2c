//! Output helpers shared by the one-shot subcommands.
//!
//! Interactive chat always renders text; `--format` only affects listings,
//! reviews and status.

pub mod json;
pub mod progress;
pub mod table;

use clap::ValueEnum;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables and colored text
    #[default]
    Text,
    /// Machine-readable JSON on stdout
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == OutputFormat::Json
    }
}
