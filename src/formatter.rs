//! Record formatter: one event record in, one SQL value tuple out.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::record::EventRecord;
use crate::transforms::{self, TransformError};

/// Destination columns, in the order tuple values are emitted.
pub const EVENT_COLUMNS: [&str; 14] = [
    "name",
    "date",
    "time",
    "time_range_display",
    "venue",
    "hotel",
    "location",
    "image_url",
    "description",
    "feature_bar",
    "info_link",
    "latitude",
    "longitude",
    "event_version",
];

/// Tag written into the `event_version` column when none is configured.
pub const DEFAULT_EVENT_VERSION: &str = "world_2025";

/// One literal in a value tuple.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// Text stored unescaped; rendered as a quoted, escaped literal
    Text(String),
    /// Rendered verbatim without quotes
    Number(String),
    Null,
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(s) => write!(f, "{}", transforms::quote_literal(s)),
            SqlValue::Number(n) => write!(f, "{}", n),
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

/// Column name to value, in [`EVENT_COLUMNS`] order.
pub type SqlRow = IndexMap<&'static str, SqlValue>;

/// Options that shape every tuple produced in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Constant written as the trailing `event_version` value
    pub event_version: String,
    /// Reject dates that are not on the calendar
    pub strict_dates: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            event_version: DEFAULT_EVENT_VERSION.to_string(),
            strict_dates: false,
        }
    }
}

/// Build the ordered column values for one record.
///
/// The only failure is a date that cannot be converted.
pub fn sql_row(record: &EventRecord, options: &FormatOptions) -> Result<SqlRow, TransformError> {
    let date = if options.strict_dates {
        transforms::convert_date_checked(&record.date)?
    } else {
        transforms::convert_date(&record.date)?
    };

    let text = |s: &str| SqlValue::Text(s.to_string());
    let hotel = record.hotel().map(text).unwrap_or(SqlValue::Null);

    let mut row = SqlRow::with_capacity(EVENT_COLUMNS.len());
    row.insert("name", text(&record.name));
    row.insert("date", SqlValue::Text(date));
    row.insert("time", text(&record.time));
    row.insert("time_range_display", text(&record.time_range_display));
    row.insert("venue", text(&record.venue));
    row.insert("hotel", hotel);
    row.insert("location", text(&record.location));
    row.insert("image_url", text(&record.image_url));
    row.insert("description", text(&record.description));
    row.insert("feature_bar", text(&record.feature_bar));
    row.insert("info_link", text(&record.info_link));
    row.insert("latitude", SqlValue::Number(record.latitude.clone()));
    row.insert("longitude", SqlValue::Number(record.longitude.clone()));
    row.insert("event_version", text(&options.event_version));

    Ok(row)
}

/// Render a row as a parenthesized, multi-line value tuple.
///
/// No trailing comma or newline; the statement writer adds separators.
pub fn render_tuple(row: &SqlRow) -> String {
    let values = row
        .values()
        .map(|value| format!("    {}", value))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("  (\n{}\n  )", values)
}

/// Format one record as a value tuple for a multi-row `INSERT`.
pub fn generate_sql_insert(
    record: &EventRecord,
    options: &FormatOptions,
) -> Result<String, TransformError> {
    Ok(render_tuple(&sql_row(record, options)?))
}
