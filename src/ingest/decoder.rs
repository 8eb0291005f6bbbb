//! Incremental UTF-8 decoder.
//!
//! Chunks may end anywhere, including inside a multi-byte character. The
//! decoder carries the unfinished tail of one chunk (at most three bytes)
//! into the next and completes it from the head of that chunk; bytes already
//! decoded are never looked at again.

use crate::error::decode::DecodeError;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Stateful UTF-8 decoder for a chunked byte stream.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Leading bytes of a character split across chunks
    carry: Vec<u8>,

    /// Bytes consumed so far, for error offsets
    consumed: u64,

    /// Whether any text has been produced yet
    started: bool,
}

impl Utf8StreamDecoder {
    /// Creates a decoder positioned at the start of a stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `chunk`, appending complete characters to `out`.
    ///
    /// A leading byte-order mark at the very start of the stream is dropped.
    pub fn decode(&mut self, mut chunk: &[u8], out: &mut String) -> Result<(), DecodeError> {
        let mark = out.len();

        if !self.carry.is_empty() {
            let width = char_width(self.carry[0]);
            let take = (width - self.carry.len()).min(chunk.len());
            self.carry.extend_from_slice(&chunk[..take]);
            chunk = &chunk[take..];

            if self.carry.len() < width {
                return Ok(());
            }

            match std::str::from_utf8(&self.carry) {
                Ok(text) => out.push_str(text),
                Err(_) => {
                    return Err(DecodeError::InvalidSequence {
                        offset: self.consumed,
                    })
                }
            }
            self.consumed += self.carry.len() as u64;
            self.carry.clear();
        }

        match std::str::from_utf8(chunk) {
            Ok(text) => {
                out.push_str(text);
                self.consumed += chunk.len() as u64;
            }
            Err(err) => {
                let valid = err.valid_up_to();
                // The prefix up to `valid_up_to` is guaranteed to be UTF-8.
                if let Ok(text) = std::str::from_utf8(&chunk[..valid]) {
                    out.push_str(text);
                }
                self.consumed += valid as u64;

                match err.error_len() {
                    Some(_) => {
                        return Err(DecodeError::InvalidSequence {
                            offset: self.consumed,
                        })
                    }
                    None => self.carry.extend_from_slice(&chunk[valid..]),
                }
            }
        }

        if !self.started && out.len() > mark {
            self.started = true;
            if out[mark..].starts_with(BYTE_ORDER_MARK) {
                out.replace_range(mark..mark + BYTE_ORDER_MARK.len_utf8(), "");
            }
        }

        Ok(())
    }

    /// Ends the stream, failing if a character was left unfinished.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        if self.carry.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Truncated {
                pending: self.carry.len(),
            })
        }
    }

    /// Returns the number of bytes decoded so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

/// Expected length of a character from its lead byte.
///
/// The carry only ever holds a valid prefix reported by `from_utf8`, so the
/// lead byte is always a legal 2-, 3- or 4-byte lead.
fn char_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> Result<String, DecodeError> {
        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode(chunk, &mut out)?;
        }
        decoder.finish()?;
        Ok(out)
    }

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(decode_all(&[b"abc", b"\ndef"]).unwrap(), "abc\ndef");
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let bytes = "naïve 日本 🦀".as_bytes();
        for split in 0..=bytes.len() {
            let (head, tail) = bytes.split_at(split);
            assert_eq!(decode_all(&[head, tail]).unwrap(), "naïve 日本 🦀");
        }
    }

    #[test]
    fn test_four_byte_char_one_byte_per_chunk() {
        let bytes = "🦀".as_bytes();
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_all(&chunks).unwrap(), "🦀");
    }

    #[test]
    fn test_invalid_byte_reports_offset() {
        let err = decode_all(&[b"ab", b"c\xFFd"]).unwrap_err();
        assert_eq!(err, DecodeError::InvalidSequence { offset: 3 });
    }

    #[test]
    fn test_invalid_continuation_after_carry() {
        // 0xE6 opens a 3-byte sequence; 'x' cannot continue it.
        let err = decode_all(&[b"a\xE6", b"xyz"]).unwrap_err();
        assert_eq!(err, DecodeError::InvalidSequence { offset: 1 });
    }

    #[test]
    fn test_truncated_stream() {
        let err = decode_all(&[b"abc\xE6\x97"]).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { pending: 2 });
    }

    #[test]
    fn test_byte_order_mark_dropped_once() {
        let bom = "\u{FEFF}".as_bytes();
        assert_eq!(decode_all(&[&bom[..1], &bom[1..], b"word"]).unwrap(), "word");
        assert_eq!(decode_all(&[b"a", bom]).unwrap(), "a\u{FEFF}");
    }

    #[test]
    fn test_empty_chunks_are_harmless() {
        assert_eq!(decode_all(&[b"", b"ok", b""]).unwrap(), "ok");
    }
}
