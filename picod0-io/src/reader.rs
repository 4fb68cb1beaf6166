//! JSON-lines event reader.
//!

use crate::{Error, Result};
use picod0_core::PicoEvent;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads one [`PicoEvent`] per line of JSON.
///
/// Blank lines are skipped. A malformed line yields
/// [`Error::InvalidRecord`] with its 1-based line number; iteration can
/// continue past it.
pub struct JsonLinesEventReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl JsonLinesEventReader<BufReader<File>> {
    /// Opens a JSON-lines event file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesEventReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of input lines consumed so far.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads up to `max` events, stopping early at end of input.
    ///
    /// # Errors
    /// Returns the first read or decode error.
    pub fn read_chunk(&mut self, max: usize) -> Result<Vec<PicoEvent>> {
        let mut events = Vec::with_capacity(max.min(4096));
        while events.len() < max {
            match self.next() {
                Some(event) => events.push(event?),
                None => break,
            }
        }
        Ok(events)
    }
}

impl<R: BufRead> Iterator for JsonLinesEventReader<R> {
    type Item = Result<PicoEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let text = self.buf.trim();
                    if text.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(text).map_err(|source| {
                        Error::InvalidRecord {
                            line: self.line,
                            source,
                        }
                    }));
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}
