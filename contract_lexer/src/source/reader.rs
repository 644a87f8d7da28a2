//! Reader-backed character sources

use super::{CharSource, SourceError};
use crate::config::compile_time::source::{MAX_FILE_SIZE, READ_BUFFER_SIZE};
use crate::logging::codes;
use crate::{log_error, log_success};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Character source decoding UTF-8 incrementally from any `Read`
///
/// Input is pulled one buffer at a time. A multi-byte character split across
/// buffers is completed by the next refill. Every character before an
/// invalid byte is delivered; `read` fails with `InvalidEncoding` only once
/// the invalid byte is reached. I/O failures surface as `SourceError::Io`.
pub struct ReaderSource<R: Read> {
    reader: BufReader<R>,
    /// Bytes of an incomplete trailing character
    carry: Vec<u8>,
    chars: Vec<char>,
    position: usize,
    pending: Vec<char>,
    finished: bool,
    invalid: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(READ_BUFFER_SIZE, inner)
    }

    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity.max(1), inner),
            carry: Vec::new(),
            chars: Vec::new(),
            position: 0,
            pending: Vec::new(),
            finished: false,
            invalid: false,
        }
    }

    fn refill(&mut self) -> Result<(), SourceError> {
        self.chars.clear();
        self.position = 0;

        let buffer = self.reader.fill_buf().map_err(SourceError::from_io)?;
        if buffer.is_empty() {
            self.finished = true;
            // A character cut off by end of input
            if !self.carry.is_empty() {
                self.carry.clear();
                self.invalid = true;
            }
            return Ok(());
        }
        let read = buffer.len();
        self.carry.extend_from_slice(buffer);
        self.reader.consume(read);

        match std::str::from_utf8(&self.carry) {
            Ok(text) => {
                self.chars.extend(text.chars());
                self.carry.clear();
            }
            Err(error) => {
                let valid = error.valid_up_to();
                let prefix = std::str::from_utf8(&self.carry[..valid]).unwrap_or_default();
                self.chars.extend(prefix.chars());
                if error.error_len().is_some() {
                    self.invalid = true;
                    self.carry.clear();
                } else {
                    self.carry.drain(..valid);
                }
            }
        }
        Ok(())
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn read(&mut self) -> Result<Option<char>, SourceError> {
        if let Some(ch) = self.pending.pop() {
            return Ok(Some(ch));
        }
        while self.position >= self.chars.len() {
            if self.invalid {
                return Err(SourceError::InvalidEncoding);
            }
            if self.finished {
                return Ok(None);
            }
            self.refill()?;
        }
        let ch = self.chars[self.position];
        self.position += 1;
        Ok(Some(ch))
    }

    fn unread(&mut self, ch: char) {
        self.pending.push(ch);
    }
}

/// Open a file as a character source, enforcing the maximum file size
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<ReaderSource<File>, SourceError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SourceError::FileNotFound {
            path: path_str.clone(),
        },
        _ => SourceError::from_io(e),
    })?;

    if metadata.len() > MAX_FILE_SIZE {
        let error = SourceError::FileTooLarge {
            size: metadata.len(),
            max_size: MAX_FILE_SIZE,
        };
        log_error!(error.error_code(), "Source file exceeds size limit",
            "path" => &path_str,
            "size" => metadata.len(),
            "max_size" => MAX_FILE_SIZE
        );
        return Err(error);
    }

    let file = File::open(path).map_err(SourceError::from_io)?;

    log_success!(codes::success::SOURCE_OPENED, "Opened source file",
        "path" => &path_str,
        "size" => metadata.len()
    );

    Ok(ReaderSource::new(file))
}
