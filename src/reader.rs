//! Reads event records from delimited text.
//!
//! The first row is a header naming every field of [`EventRecord`] exactly
//! once, in any order. Quoted cells may contain commas, quotes and newlines.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::record::{EventRecord, FIELD_NAMES};

/// Error type for reading records
#[derive(Debug)]
pub enum ReadError {
    Io(std::io::Error),
    Csv(csv::Error),
    HeaderMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    /// A data row could not be read or decoded; `row` is 1-based
    Row { row: usize, reason: String },
}

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        ReadError::Io(err)
    }
}

impl From<csv::Error> for ReadError {
    fn from(err: csv::Error) -> Self {
        ReadError::Csv(err)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "IO error: {}", e),
            ReadError::Csv(e) => write!(f, "CSV error: {}", e),
            ReadError::HeaderMismatch { missing, unexpected } => {
                write!(f, "Header mismatch")?;
                if !missing.is_empty() {
                    write!(f, "; missing: {}", missing.join(", "))?;
                }
                if !unexpected.is_empty() {
                    write!(f, "; unexpected: {}", unexpected.join(", "))?;
                }
                Ok(())
            }
            ReadError::Row { row, reason } => write!(f, "Row {}: {}", row, reason),
        }
    }
}

impl std::error::Error for ReadError {}

/// Check a header row against [`FIELD_NAMES`].
///
/// Duplicated names are reported as unexpected.
pub fn validate_headers<'a, I>(headers: I) -> Result<(), ReadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<&str> = Vec::new();
    let mut unexpected = Vec::new();

    for header in headers {
        if FIELD_NAMES.contains(&header) && !seen.contains(&header) {
            seen.push(header);
        } else {
            unexpected.push(header.to_string());
        }
    }

    let missing: Vec<String> = FIELD_NAMES
        .iter()
        .filter(|name| !seen.contains(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(ReadError::HeaderMismatch { missing, unexpected })
    }
}

/// Streaming reader yielding one [`EventRecord`] per data row.
pub struct EventReader<R: Read> {
    inner: csv::Reader<R>,
    headers: csv::StringRecord,
    buffer: csv::StringRecord,
    row: usize,
}

impl EventReader<File> {
    /// Open a file and validate its header row
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

impl<R: Read> EventReader<R> {
    /// Wrap any byte source and validate its header row
    pub fn from_reader(source: R) -> Result<Self, ReadError> {
        let mut inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::None)
            .from_reader(source);

        let headers = inner.headers()?.clone();
        validate_headers(headers.iter())?;

        Ok(Self {
            inner,
            headers,
            buffer: csv::StringRecord::new(),
            row: 0,
        })
    }

    /// Number of data rows read so far
    pub fn rows_read(&self) -> usize {
        self.row
    }

    fn next_record(&mut self) -> Option<Result<EventRecord, ReadError>> {
        let has_row = match self.inner.read_record(&mut self.buffer) {
            Ok(has_row) => has_row,
            Err(e) => {
                self.row += 1;
                return Some(Err(ReadError::Row {
                    row: self.row,
                    reason: e.to_string(),
                }));
            }
        };
        if !has_row {
            return None;
        }

        self.row += 1;
        let record = self
            .buffer
            .deserialize::<EventRecord>(Some(&self.headers))
            .map_err(|e| ReadError::Row {
                row: self.row,
                reason: e.to_string(),
            });
        Some(record)
    }
}

impl<R: Read> Iterator for EventReader<R> {
    type Item = Result<EventRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}
