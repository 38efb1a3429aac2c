use std::io::Write;

use anyhow::Result;
use serde::Serialize;

/// Pretty JSON for `--format json`, so listings can be piped into `jq`.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_json(&mut stdout, value)
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::site;

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &site::features()[..1]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("]\n"));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["href"], "/chat");
    }
}
