//! End-to-end runs: records in, SQL (or a validation report) out.

use std::fmt;
use std::io::{Read, Write};

use crate::config::{ConfigError, SeedSettings};
use crate::formatter::{sql_row, SqlRow};
use crate::reader::{EventReader, ReadError};
use crate::serialization::{InsertWriter, NdjsonWriter, SerializationError};
use crate::transforms::TransformError;

/// Error type for a seeding run
#[derive(Debug)]
pub enum SeedError {
    Config(ConfigError),
    Read(ReadError),
    /// A record was read but could not be formatted; `row` is 1-based
    Format { row: usize, source: TransformError },
    Write(SerializationError),
}

impl From<ConfigError> for SeedError {
    fn from(err: ConfigError) -> Self {
        SeedError::Config(err)
    }
}

impl From<ReadError> for SeedError {
    fn from(err: ReadError) -> Self {
        SeedError::Read(err)
    }
}

impl From<SerializationError> for SeedError {
    fn from(err: SerializationError) -> Self {
        SeedError::Write(err)
    }
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Config(e) => write!(f, "{}", e),
            SeedError::Read(e) => write!(f, "{}", e),
            SeedError::Format { row, source } => write!(f, "Row {}: {}", row, source),
            SeedError::Write(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SeedError {}

/// Read and format every record, handing each row to `sink`.
///
/// Stops at the first record that fails to read or format.
fn for_each_row<R, F>(
    reader: EventReader<R>,
    settings: &SeedSettings,
    mut sink: F,
) -> Result<usize, SeedError>
where
    R: Read,
    F: FnMut(usize, &SqlRow) -> Result<(), SeedError>,
{
    let mut count = 0;
    for (index, record) in reader.enumerate() {
        let row_number = index + 1;
        let record = record?;
        let row = sql_row(&record, &settings.format).map_err(|source| SeedError::Format {
            row: row_number,
            source,
        })?;

        tracing::debug!(row = row_number, name = %record.name, "formatted event record");
        sink(row_number, &row)?;
        count += 1;
    }
    Ok(count)
}

/// Convert every record into `INSERT` statements written to `out`.
///
/// Returns the number of rows written. Nothing after the failing row is
/// written, but rows before it may already be in `out`.
pub fn generate_seed_sql<R, W>(
    reader: EventReader<R>,
    out: W,
    settings: &SeedSettings,
) -> Result<usize, SeedError>
where
    R: Read,
    W: Write,
{
    let mut writer = InsertWriter::new(out, &settings.table, settings.rows_per_statement);
    for_each_row(reader, settings, |_, row| Ok(writer.write_row(row)?))?;

    let written = writer.finish()?;
    tracing::info!(rows = written, table = %settings.table, "wrote seed statements");
    Ok(written)
}

/// Format every record without producing SQL.
///
/// With `report` set, each normalized row is written to it as NDJSON.
pub fn validate_records<R, W>(
    reader: EventReader<R>,
    report: Option<W>,
    settings: &SeedSettings,
) -> Result<usize, SeedError>
where
    R: Read,
    W: Write,
{
    let mut ndjson = report.map(NdjsonWriter::new);
    let count = for_each_row(reader, settings, |row_number, row| {
        if let Some(writer) = ndjson.as_mut() {
            writer.write(row_number, row)?;
        }
        Ok(())
    })?;

    if let Some(writer) = ndjson.as_mut() {
        writer.flush()?;
    }
    tracing::info!(rows = count, "validated event records");
    Ok(count)
}
