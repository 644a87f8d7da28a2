//! Character sources feeding the tokenizer
//!
//! A source yields one character at a time and accepts characters pushed
//! back onto it. Pushed back characters come out again most recent first.

mod reader;

use crate::logging::codes;
pub use reader::{open_file, ReaderSource};

/// Failures raised while pulling characters from an input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Input is not valid UTF-8")]
    InvalidEncoding,

    #[error("I/O error reading input: {message}")]
    Io { message: String },
}

impl SourceError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SourceError::FileNotFound { .. } => codes::source::FILE_NOT_FOUND,
            SourceError::FileTooLarge { .. } => codes::source::FILE_TOO_LARGE,
            SourceError::InvalidEncoding => codes::source::INVALID_ENCODING,
            SourceError::Io { .. } => codes::source::IO_ERROR,
        }
    }

    pub(crate) fn from_io(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::InvalidData => SourceError::InvalidEncoding,
            _ => SourceError::Io {
                message: error.to_string(),
            },
        }
    }
}

/// Minimal read/unread capability over sequential character input
pub trait CharSource {
    /// Next character, or `None` at end of input
    fn read(&mut self) -> Result<Option<char>, SourceError>;

    /// Push a character back; the next `read` returns it
    fn unread(&mut self, ch: char);
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read(&mut self) -> Result<Option<char>, SourceError> {
        (**self).read()
    }

    fn unread(&mut self, ch: char) {
        (**self).unread(ch)
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn read(&mut self) -> Result<Option<char>, SourceError> {
        (**self).read()
    }

    fn unread(&mut self, ch: char) {
        (**self).unread(ch)
    }
}

/// In-memory character source over owned text
#[derive(Debug, Clone)]
pub struct StringSource {
    chars: Vec<char>,
    position: usize,
    pending: Vec<char>,
}

impl StringSource {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
            pending: Vec::new(),
        }
    }
}

impl From<&str> for StringSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StringSource {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl CharSource for StringSource {
    fn read(&mut self) -> Result<Option<char>, SourceError> {
        if let Some(ch) = self.pending.pop() {
            return Ok(Some(ch));
        }
        let ch = self.chars.get(self.position).copied();
        if ch.is_some() {
            self.position += 1;
        }
        Ok(ch)
    }

    fn unread(&mut self, ch: char) {
        self.pending.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_source_reads_in_order() {
        let mut source = StringSource::new("aé\n");
        assert_eq!(source.read(), Ok(Some('a')));
        assert_eq!(source.read(), Ok(Some('é')));
        assert_eq!(source.read(), Ok(Some('\n')));
        assert_eq!(source.read(), Ok(None));
        assert_eq!(source.read(), Ok(None));
    }

    #[test]
    fn test_unread_is_lifo() {
        let mut source = StringSource::new("xyz");
        assert_eq!(source.read(), Ok(Some('x')));
        assert_eq!(source.read(), Ok(Some('y')));
        source.unread('y');
        source.unread('x');
        assert_eq!(source.read(), Ok(Some('x')));
        assert_eq!(source.read(), Ok(Some('y')));
        assert_eq!(source.read(), Ok(Some('z')));
    }

    #[test]
    fn test_unread_after_end_of_input() {
        let mut source = StringSource::new("a");
        assert_eq!(source.read(), Ok(Some('a')));
        assert_eq!(source.read(), Ok(None));
        source.unread('a');
        assert_eq!(source.read(), Ok(Some('a')));
        assert_eq!(source.read(), Ok(None));
    }

    #[test]
    fn test_io_error_classification() {
        let invalid = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        assert_eq!(SourceError::from_io(invalid), SourceError::InvalidEncoding);

        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert_eq!(
            SourceError::from_io(broken).error_code(),
            codes::source::IO_ERROR
        );
    }
}
