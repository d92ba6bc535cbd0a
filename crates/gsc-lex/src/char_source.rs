//! Character sources the lexer can be driven from.
//!
//! [`CharSource`] is the lexer's only window onto its input: `has_next`,
//! `peek`, and `advance`. Two implementations are provided, one over an
//! in-memory string and one over a file, so the lexer itself never needs to
//! know whether it is reading a borrowed `&str` or a file on disk.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::Chars;

use thiserror::Error;

/// An I/O failure surfaced by a [`CharSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the next character from the underlying file failed.
    #[error("failed to read source file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file contains a byte sequence that is not valid UTF-8.
    #[error("source file {path} is not valid UTF-8 at byte offset {offset}")]
    InvalidUtf8 { path: String, offset: u64 },
}

/// A pull-based source of characters for the lexer.
///
/// Implementations are expected to keep exactly one character of lookahead
/// buffered, so `has_next`/`peek` are always O(1) and never themselves touch
/// the underlying I/O.
pub trait CharSource {
    /// Whether another character is available without advancing.
    fn has_next(&self) -> bool;

    /// The next character, if any, without consuming it.
    fn peek(&self) -> Option<char>;

    /// Consumes and returns the current lookahead character, refilling the
    /// lookahead from the underlying source. Fails if refilling requires an
    /// I/O read that errors.
    fn advance(&mut self) -> Result<Option<char>, SourceError>;
}

/// A [`CharSource`] over an in-memory string slice. Never fails.
pub struct StringSource<'a> {
    chars: Chars<'a>,
    lookahead: Option<char>,
}

impl<'a> StringSource<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let lookahead = chars.next();
        Self { chars, lookahead }
    }
}

impl<'a> CharSource for StringSource<'a> {
    fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    fn peek(&self) -> Option<char> {
        self.lookahead
    }

    fn advance(&mut self) -> Result<Option<char>, SourceError> {
        let current = self.lookahead;
        self.lookahead = self.chars.next();
        Ok(current)
    }
}

/// A [`CharSource`] over a file on disk.
///
/// Reads are buffered one UTF-8 character ahead so `peek` stays O(1); a
/// malformed byte sequence or an I/O error on the underlying file is
/// reported through [`SourceError`] at the `advance` that would need to
/// refill past it.
pub struct FileSource {
    path: String,
    file: File,
    byte_offset: u64,
    lookahead: Option<char>,
}

impl FileSource {
    /// Opens `path` and pre-reads its first character.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path_str = path.as_ref().display().to_string();
        let file = File::open(path.as_ref()).map_err(|source| SourceError::Read {
            path: path_str.clone(),
            source,
        })?;
        let mut source = Self {
            path: path_str,
            file,
            byte_offset: 0,
            lookahead: None,
        };
        source.lookahead = source.read_char()?;
        Ok(source)
    }

    /// Reads the next UTF-8 scalar value from the file, or `None` at EOF.
    fn read_char(&mut self) -> Result<Option<char>, SourceError> {
        let mut buf = [0u8; 4];
        let first_read = self.read_exact_n(&mut buf[..1])?;
        if first_read == 0 {
            return Ok(None);
        }
        let width = utf8_width(buf[0]);
        if width > 1 {
            let read = self.read_exact_n(&mut buf[1..width])?;
            if read != width - 1 {
                return Err(SourceError::InvalidUtf8 {
                    path: self.path.clone(),
                    offset: self.byte_offset,
                });
            }
        }
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| SourceError::InvalidUtf8 {
                path: self.path.clone(),
                offset: self.byte_offset,
            })
            .map(Some)
    }

    fn read_exact_n(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let mut total = 0;
        while total < buf.len() {
            match self.file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => {
                    total += n;
                    self.byte_offset += n as u64;
                }
                Err(source) => {
                    return Err(SourceError::Read {
                        path: self.path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(total)
    }
}

impl CharSource for FileSource {
    fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    fn peek(&self) -> Option<char> {
        self.lookahead
    }

    fn advance(&mut self) -> Result<Option<char>, SourceError> {
        let current = self.lookahead;
        self.lookahead = self.read_char()?;
        Ok(current)
    }
}

/// The number of bytes a UTF-8 sequence occupies given its leading byte.
fn utf8_width(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_source_basic() {
        let mut s = StringSource::new("ab");
        assert!(s.has_next());
        assert_eq!(s.peek(), Some('a'));
        assert_eq!(s.advance().unwrap(), Some('a'));
        assert_eq!(s.peek(), Some('b'));
        assert_eq!(s.advance().unwrap(), Some('b'));
        assert!(!s.has_next());
        assert_eq!(s.advance().unwrap(), None);
    }

    #[test]
    fn test_string_source_empty() {
        let mut s = StringSource::new("");
        assert!(!s.has_next());
        assert_eq!(s.peek(), None);
        assert_eq!(s.advance().unwrap(), None);
    }

    #[test]
    fn test_string_source_unicode() {
        let mut s = StringSource::new("a\u{1F600}b");
        assert_eq!(s.advance().unwrap(), Some('a'));
        assert_eq!(s.advance().unwrap(), Some('\u{1F600}'));
        assert_eq!(s.advance().unwrap(), Some('b'));
    }

    #[test]
    fn test_file_source_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        write!(file, "hi\u{00e9}").unwrap();
        let mut source = FileSource::open(file.path()).unwrap();
        assert_eq!(source.advance().unwrap(), Some('h'));
        assert_eq!(source.advance().unwrap(), Some('i'));
        assert_eq!(source.advance().unwrap(), Some('\u{00e9}'));
        assert_eq!(source.advance().unwrap(), None);
    }

    #[test]
    fn test_file_source_missing_file() {
        let err = FileSource::open("/does/not/exist/gsc-test-file");
        assert!(err.is_err());
    }
}
