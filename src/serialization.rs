//! Writers for formatted event rows.
//!
//! [`InsertWriter`] assembles value tuples into multi-row `INSERT` statements;
//! [`NdjsonWriter`] emits the same rows as newline-delimited JSON.

use serde_json::json;
use std::io::Write;

use crate::formatter::{render_tuple, SqlRow, EVENT_COLUMNS};

/// Error type for serialization operations
#[derive(Debug)]
pub enum SerializationError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Json(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::Io(err)
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::Io(e) => write!(f, "Failed to write output: {}", e),
            SerializationError::Json(e) => write!(f, "Failed to encode row as JSON: {}", e),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Comment written in place of a statement when there are no rows.
pub const EMPTY_OUTPUT_COMMENT: &str = "-- no event records";

/// `INSERT INTO <table> (<columns>)` followed by `VALUES`, each on its own line.
pub fn insert_preamble(table: &str) -> String {
    format!(
        "INSERT INTO {} ({})\nVALUES\n",
        table,
        EVENT_COLUMNS.join(", ")
    )
}

/// Multi-row `INSERT` statement writer
///
/// Tuples are separated by `,\n` and each statement ends with `;`. With
/// `rows_per_statement > 0` a fresh statement is started once the current
/// one is full, separated by a blank line.
pub struct InsertWriter<W: Write> {
    writer: W,
    preamble: String,
    rows_per_statement: usize,
    rows_in_statement: usize,
    total: usize,
}

impl<W: Write> InsertWriter<W> {
    /// Create a writer targeting `table`; `rows_per_statement == 0` means unlimited
    pub fn new(writer: W, table: &str, rows_per_statement: usize) -> Self {
        Self {
            writer,
            preamble: insert_preamble(table),
            rows_per_statement,
            rows_in_statement: 0,
            total: 0,
        }
    }

    /// Append one row to the current statement
    pub fn write_row(&mut self, row: &SqlRow) -> Result<(), SerializationError> {
        if self.rows_per_statement > 0 && self.rows_in_statement == self.rows_per_statement {
            write!(self.writer, ";\n\n")?;
            self.rows_in_statement = 0;
        }

        if self.rows_in_statement == 0 {
            write!(self.writer, "{}", self.preamble)?;
        } else {
            writeln!(self.writer, ",")?;
        }

        write!(self.writer, "{}", render_tuple(row))?;
        self.rows_in_statement += 1;
        self.total += 1;
        Ok(())
    }

    /// Rows written so far
    pub fn rows_written(&self) -> usize {
        self.total
    }

    /// Terminate the open statement and flush. Returns the number of rows written.
    pub fn finish(mut self) -> Result<usize, SerializationError> {
        if self.total == 0 {
            writeln!(self.writer, "{}", EMPTY_OUTPUT_COMMENT)?;
        } else {
            writeln!(self.writer, ";")?;
        }
        self.writer.flush()?;
        Ok(self.total)
    }
}

/// NDJSON (Newline Delimited JSON) writer
///
/// One line per row: `{"row": <n>, "values": {<column>: <value>, ...}}`,
/// with columns in output order.
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one formatted row, tagged with its 1-based input row number
    pub fn write(&mut self, row_number: usize, row: &SqlRow) -> Result<(), SerializationError> {
        let line = json!({ "row": row_number, "values": row });
        writeln!(self.writer, "{}", serde_json::to_string(&line)?)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{sql_row, FormatOptions};
    use crate::record::fixtures::mamba_negra;

    fn rows(n: usize) -> Vec<SqlRow> {
        (0..n)
            .map(|i| {
                let mut record = mamba_negra();
                record.name = format!("Event {}", i + 1);
                sql_row(&record, &FormatOptions::default()).unwrap()
            })
            .collect()
    }

    fn write_all(rows: &[SqlRow], rows_per_statement: usize) -> String {
        let mut buf = Vec::new();
        let mut writer = InsertWriter::new(&mut buf, "events", rows_per_statement);
        for row in rows {
            writer.write_row(row).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), rows.len());
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_preamble() {
        assert_eq!(
            insert_preamble("events"),
            "INSERT INTO events (name, date, time, time_range_display, venue, hotel, location, image_url, description, feature_bar, info_link, latitude, longitude, event_version)\nVALUES\n"
        );
    }

    #[test]
    fn test_single_statement() {
        let rows = rows(2);
        let output = write_all(&rows, 0);

        let expected = format!(
            "{}{},\n{};\n",
            insert_preamble("events"),
            render_tuple(&rows[0]),
            render_tuple(&rows[1])
        );
        assert_eq!(output, expected);
        assert_eq!(output.matches("INSERT INTO").count(), 1);
    }

    #[test]
    fn test_rows_per_statement_splits() {
        let output = write_all(&rows(5), 2);

        assert_eq!(output.matches("INSERT INTO events").count(), 3);
        assert_eq!(output.matches(";\n").count(), 3);
        assert!(output.contains("  );\n\nINSERT INTO events"));
        assert!(output.ends_with("  );\n"));
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_statement() {
        let output = write_all(&rows(4), 2);
        assert_eq!(output.matches("INSERT INTO events").count(), 2);
        assert!(output.ends_with("  );\n"));
    }

    #[test]
    fn test_no_rows_writes_comment_only() {
        let output = write_all(&[], 0);
        assert_eq!(output, format!("{}\n", EMPTY_OUTPUT_COMMENT));
        assert!(!output.contains("INSERT"));
    }

    #[test]
    fn test_error_display() {
        let err: SerializationError =
            std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full").into();
        assert!(matches!(err, SerializationError::Io(_)));
        assert_eq!(err.to_string(), "Failed to write output: disk full");
    }

    #[test]
    fn test_ndjson_writer() {
        let mut buf = Vec::new();
        let mut writer = NdjsonWriter::new(&mut buf);

        for (i, row) in rows(2).iter().enumerate() {
            writer.write(i + 1, row).unwrap();
        }
        writer.flush().unwrap();

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["row"], 1);
        assert_eq!(lines[0]["values"]["name"], "Event 1");
        assert_eq!(lines[1]["values"]["date"], "2025-10-09");
        assert!(lines[1]["values"]["hotel"].is_null());
    }
}
