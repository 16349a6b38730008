//! # event-seed: SQL seed statements from event datasets
//!
//! Reads venue event records from delimited text and renders them as a
//! multi-row `INSERT` statement for an events table.
//!
//! ## Pipeline
//!
//! 1. [`EventReader`] validates the header row and yields [`EventRecord`]s
//! 2. [`formatter::sql_row`] converts dates, escapes quotes and maps an
//!    absent hotel to `NULL`
//! 3. [`InsertWriter`] joins the value tuples into `INSERT ... VALUES` text
//!
//! ## Example
//!
//! ```
//! use event_seed::{generate_seed_sql, EventReader, SeedSettings};
//!
//! let csv = "name,date,time,venue,hotel,location,image_url,description,feature_bar,info_link,time_range_display,latitude,longitude,event_version,event_year\n\
//!            Mamba Negra x Duddells,09/10/2025,18:00,Duddells,,Central,,Duddell's,Bar,https://x,6pm-10pm,22.2804063,114.1572531,world_2025,2025\n";
//!
//! let reader = EventReader::from_reader(csv.as_bytes()).unwrap();
//! let mut out = Vec::new();
//! generate_seed_sql(reader, &mut out, &SeedSettings::default()).unwrap();
//!
//! let sql = String::from_utf8(out).unwrap();
//! assert!(sql.contains("'2025-10-09'"));
//! assert!(sql.contains("'Duddell''s'"));
//! ```

// Core modules
pub mod record;
pub mod transforms;
pub mod formatter;

// Input, output and orchestration
pub mod reader;
pub mod serialization;
pub mod config;
pub mod pipeline;

// Re-export key types
pub use record::{EventRecord, FIELD_NAMES};
pub use transforms::{convert_date, escape_sql_string, unescape_sql_string, TransformError};
pub use formatter::{generate_sql_insert, FormatOptions, SqlRow, SqlValue, EVENT_COLUMNS};
pub use reader::{EventReader, ReadError};
pub use serialization::{InsertWriter, NdjsonWriter, SerializationError};
pub use config::{ConfigError, Overrides, SeedConfig, SeedSettings};
pub use pipeline::{generate_seed_sql, validate_records, SeedError};
