/// Incremental UTF-8 decoder for chunked byte streams.
///
/// A code point split across two chunks is held back until its remaining bytes
/// arrive. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (plus any held bytes) as forms complete characters.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut decoded = String::new();
        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    decoded.push_str(text);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    decoded.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        decoded
    }

    /// Flush held bytes at end of stream.
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_code_point_is_held() {
        let bytes = "héllo ❌".as_bytes();
        let mut decoder = Utf8Decoder::new();

        // split inside "é"
        let first = decoder.push(&bytes[..2]);
        assert_eq!(first, "h");
        assert!(decoder.has_pending());

        // split inside "❌"
        let cut = bytes.len() - 1;
        let second = decoder.push(&bytes[2..cut]);
        assert_eq!(second, "éllo ");
        let third = decoder.push(&bytes[cut..]);
        assert_eq!(third, "❌");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(b"a\xffb"), "a\u{fffd}b");
    }

    #[test]
    fn test_finish_flushes_truncated_tail() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(&[b'x', 0xe2, 0x9d]), "x");
        assert_eq!(decoder.finish(), "\u{fffd}");
        assert!(!decoder.has_pending());
    }
}
