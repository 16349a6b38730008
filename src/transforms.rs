//! Field-level transforms applied while turning an event record into SQL literals.
//!
//! Each transform is a pure function over text: date reformatting from
//! `D/M/Y` to `Y-M-D`, and single-quote escaping for SQL string literals.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Error type for transform operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The date text is not three numeric components separated by `/`
    MalformedDate { value: String },
    /// The date text is well-formed but names a day that does not exist
    ImpossibleDate { value: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::MalformedDate { value } => {
                write!(f, "Malformed date '{}': expected day/month/year", value)
            }
            TransformError::ImpossibleDate { value } => {
                write!(f, "Date '{}' does not exist on the calendar", value)
            }
        }
    }
}

impl std::error::Error for TransformError {}

static DATE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn date_pattern() -> &'static Regex {
    DATE_PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]+)/([0-9]+)/([0-9]+)$").expect("valid date regex")
    })
}

/// Parsed components of a `D/M/Y` date.
struct DateParts<'a> {
    day: u32,
    month: u32,
    year: &'a str,
}

fn split_date(text: &str) -> Result<DateParts<'_>, TransformError> {
    let malformed = || TransformError::MalformedDate {
        value: text.to_string(),
    };

    let caps = date_pattern().captures(text).ok_or_else(malformed)?;

    // Components are ASCII digits; parsing only fails on overflow.
    let day = caps[1].parse::<u32>().map_err(|_| malformed())?;
    let month = caps[2].parse::<u32>().map_err(|_| malformed())?;
    let year = caps.get(3).map(|m| m.as_str()).ok_or_else(malformed)?;

    Ok(DateParts { day, month, year })
}

/// Convert a `D/M/Y` date into `Y-M-D`, zero-padding day and month to two digits.
///
/// The year is carried over exactly as written.
///
/// # Example
///
/// ```
/// use event_seed::transforms::convert_date;
///
/// assert_eq!(convert_date("09/10/2025").unwrap(), "2025-10-09");
/// assert_eq!(convert_date("7/3/2025").unwrap(), "2025-03-07");
/// ```
pub fn convert_date(text: &str) -> Result<String, TransformError> {
    let parts = split_date(text)?;
    Ok(format!("{}-{:02}-{:02}", parts.year, parts.month, parts.day))
}

/// Like [`convert_date`], but also rejects dates that are not on the calendar
/// (`31/02/2025`, `0/1/2025`).
pub fn convert_date_checked(text: &str) -> Result<String, TransformError> {
    let parts = split_date(text)?;

    let impossible = || TransformError::ImpossibleDate {
        value: text.to_string(),
    };
    let year = parts.year.parse::<i32>().map_err(|_| impossible())?;
    NaiveDate::from_ymd_opt(year, parts.month, parts.day).ok_or_else(impossible)?;

    Ok(format!("{}-{:02}-{:02}", parts.year, parts.month, parts.day))
}

/// Double every single quote so the text can sit inside a `'...'` literal.
///
/// Absent input yields an empty string.
pub fn escape_sql_string(text: Option<&str>) -> String {
    text.map(|t| t.replace('\'', "''")).unwrap_or_default()
}

/// Inverse of [`escape_sql_string`]: collapse each doubled quote back to one.
pub fn unescape_sql_string(text: &str) -> String {
    text.replace("''", "'")
}

/// Escape and wrap in single quotes.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", escape_sql_string(Some(text)))
}
