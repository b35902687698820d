use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use schemaloom_core::{Document, Error as CoreError, deserialize, serialize, validate_project};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "schemaloom", version, about = "Schemaloom CLI")]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a project document and validate its structure.
    Check(CheckArgs),
    /// Canonicalize a project document.
    Fmt(FmtArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Project document to check.
    file: PathBuf,
    /// Optional path for a machine-readable JSON report.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FmtArgs {
    /// Project document to format.
    file: PathBuf,
    /// Rewrite the file in place instead of printing to stdout.
    #[arg(long, default_value_t = false)]
    write: bool,
}

/// Summary written by `check --report`.
#[derive(Debug, Serialize)]
struct CheckReport {
    file: String,
    project: String,
    schemas: usize,
    tables: usize,
    columns: usize,
    foreign_keys: usize,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Fmt(args) => run_fmt(args),
    }
}

fn init_logging(json: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = if json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    } else {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    };
    result.map_err(|err| CliError::Logging(err.to_string()))
}

fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&args.file)?;
    let document = Document::parse(&text).map_err(CoreError::from)?;
    let project = deserialize(&document)?;
    validate_project(&project)?;

    let tables = project.tables().count();
    let columns = project.columns().count();
    let foreign_keys: usize = project
        .tables()
        .map(|(_, table)| table.foreign_keys.len())
        .sum();

    tracing::info!(
        event = "check_passed",
        file = %args.file.display(),
        project = %project.name,
        schemas = project.schemas.len(),
        tables,
        columns,
        foreign_keys,
    );

    if let Some(path) = args.report {
        let report = CheckReport {
            file: args.file.display().to_string(),
            project: project.name.clone(),
            schemas: project.schemas.len(),
            tables,
            columns,
            foreign_keys,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    println!("ok: {}", args.file.display());
    Ok(())
}

fn run_fmt(args: FmtArgs) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&args.file)?;
    let document = Document::parse(&text).map_err(CoreError::from)?;
    let project = deserialize(&document)?;
    let formatted = serialize(&project).to_xml();

    if args.write {
        if formatted == text {
            tracing::info!(event = "document_unchanged", file = %args.file.display());
        } else {
            std::fs::write(&args.file, &formatted)?;
            tracing::info!(event = "document_rewritten", file = %args.file.display());
        }
    } else {
        print!("{formatted}");
    }
    Ok(())
}
