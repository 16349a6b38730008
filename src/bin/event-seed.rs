//! event-seed CLI - turns an event dataset into SQL INSERT seed statements
//!
//! SQL goes to stdout (or `--output`); progress and errors go to stderr.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};
use std::process;

use event_seed::{
    generate_seed_sql, validate_records, EventReader, Overrides, SeedConfig, SeedError,
    SeedSettings,
};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "event-seed")]
#[command(version, about = "Convert venue event records into SQL INSERT seed statements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate INSERT statements from an event dataset
    Generate {
        /// Path to the dataset (`-` reads stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the SQL (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a seed config YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target table - overrides EVENT_SEED_TABLE and the config file
        #[arg(short, long)]
        table: Option<String>,

        /// Trailing event_version tag - overrides EVENT_SEED_VERSION and the config file
        #[arg(short = 'e', long)]
        event_version: Option<String>,

        /// Rows per INSERT statement (0 = a single statement)
        #[arg(short, long)]
        rows_per_statement: Option<usize>,

        /// Reject dates that do not exist on the calendar
        #[arg(short, long)]
        strict_dates: bool,
    },

    /// Read and format every record without writing SQL
    Validate {
        /// Path to the dataset (`-` reads stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to a seed config YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reject dates that do not exist on the calendar
        #[arg(short, long)]
        strict_dates: bool,

        /// Print each normalized record as NDJSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            table,
            event_version,
            rows_per_statement,
            strict_dates,
        } => {
            let overrides = Overrides {
                table,
                event_version,
                rows_per_statement,
                strict_dates,
            };
            generate(input, output, config, overrides)
        }
        Commands::Validate {
            input,
            config,
            strict_dates,
            json,
        } => {
            let overrides = Overrides {
                strict_dates,
                ..Overrides::default()
            };
            validate(input, config, overrides, json)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_settings(config: Option<PathBuf>, overrides: Overrides) -> Result<SeedSettings, SeedError> {
    let file = match config {
        Some(path) => {
            let loaded = SeedConfig::load_from_file(&path)?;
            eprintln!("  ℹ Loaded config from {}", path.display());
            Some(loaded)
        }
        None => None,
    };
    Ok(SeedSettings::resolve(file, overrides)?)
}

fn open_input(input: &Path) -> Result<EventReader<Box<dyn Read>>, SeedError> {
    let source: Box<dyn Read> = if input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input).map_err(|e| SeedError::Read(e.into()))?;
        Box::new(file)
    };
    Ok(EventReader::from_reader(source)?)
}

/// Write INSERT statements for every record in `input`
fn generate(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    overrides: Overrides,
) -> Result<(), SeedError> {
    let settings = load_settings(config, overrides)?;
    let reader = open_input(&input)?;

    let (written, target) = match &output {
        Some(path) => (write_sql_file(reader, path, &settings)?, path.display().to_string()),
        None => {
            let out = BufWriter::new(io::stdout().lock());
            (generate_seed_sql(reader, out, &settings)?, "stdout".to_string())
        }
    };

    eprintln!("  ✓ Wrote {} event records into {} ({})", written, settings.table, target);
    Ok(())
}

/// Stage the SQL in a temp file beside `path` and move it into place only
/// once every record has been written. A failed run leaves `path` untouched.
fn write_sql_file<R: Read>(
    reader: EventReader<R>,
    path: &Path,
    settings: &SeedSettings,
) -> Result<usize, SeedError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir).map_err(|e| SeedError::Write(e.into()))?;

    let written = generate_seed_sql(reader, BufWriter::new(staged.as_file()), settings)?;

    staged
        .persist(path)
        .map_err(|e| SeedError::Write(e.error.into()))?;
    Ok(written)
}

/// Check that every record in `input` formats cleanly
fn validate(
    input: PathBuf,
    config: Option<PathBuf>,
    overrides: Overrides,
    json: bool,
) -> Result<(), SeedError> {
    let settings = load_settings(config, overrides)?;
    let reader = open_input(&input)?;

    let report = json.then(|| BufWriter::new(io::stdout().lock()));
    let count = validate_records(reader, report, &settings)?;
    eprintln!("  ✓ {} event records are valid", count);
    Ok(())
}
