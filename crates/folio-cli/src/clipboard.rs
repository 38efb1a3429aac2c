use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use folio_core::chat::Clipboard;

/// Copies through the terminal with an OSC 52 escape sequence, so it also works
/// over SSH.
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()
    }
}

fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
