//! Tabula - print fetched tabular records as a flat table.
//!
//! Reads a saved list-records response (or a bare array of records), opens a
//! cursor over it and writes the discovered columns and every row to stdout.

mod error;
mod render;

use crate::error::{CliError, Result};
use std::path::PathBuf;
use tabula_engine::{records_from_json, Config, Cursor, StatementHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "tabula <records.json> [--limit N]";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: PathBuf,
    limit: Option<usize>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut path = None;
        let mut limit = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--limit" | "-n" => {
                    let raw = args.next().ok_or_else(|| {
                        CliError::Usage(format!("--limit needs a value; {}", USAGE))
                    })?;
                    let parsed: usize = raw
                        .parse()
                        .map_err(|_| CliError::Usage(format!("invalid limit '{}'", raw)))?;
                    limit = Some(parsed);
                }
                _ if path.is_none() && !arg.starts_with('-') => path = Some(PathBuf::from(&arg)),
                _ => {
                    return Err(CliError::Usage(format!(
                        "unexpected argument '{}'; {}",
                        arg, USAGE
                    )))
                }
            }
        }

        let path = path.ok_or_else(|| CliError::Usage(USAGE.to_string()))?;
        Ok(Self { path, limit })
    }
}

fn run(args: Args, config: Config) -> Result<usize> {
    let raw = std::fs::read_to_string(&args.path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let records = records_from_json(value, &config)?;
    tracing::info!(path = %args.path.display(), rows = records.len(), "loaded records");

    let mut cursor = Cursor::with_config(records, StatementHandle::new(), config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = render::write_table(&mut cursor, &mut out, args.limit)?;
    cursor.close()?;
    Ok(written)
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabula=info,tabula_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let args = Args::parse(std::env::args().skip(1))?;
    let written = run(args, config)?;
    tracing::info!(rows = written, "done");

    Ok(())
}
