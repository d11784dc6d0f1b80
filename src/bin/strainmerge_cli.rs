//! CLI for strainmerge.
//!
//! Usage:
//!   strainmerge_cli extract <sources...>              # summaries as JSON to stdout
//!   strainmerge_cli merge <target> <sources...> -o out.xlsx

use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use strainmerge::{extract_all, extract_reports, process, MergeError, SourceFile};

#[derive(Parser)]
#[command(name = "strainmerge")]
#[command(
    about = "Summarize instrument XLSX files and append them to a master report workbook",
    version
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract per-sample summaries from source workbooks as JSON
    Extract {
        /// Source instrument workbooks
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Write JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit full-series analysis projections instead of summaries
        #[arg(long)]
        reports: bool,
    },

    /// Append extracted summaries to a master report workbook
    Merge {
        /// Master report workbook (its first sheet receives the columns)
        target: PathBuf,
        /// Source instrument workbooks
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Output workbook path (default: merged_<YYMMDD>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> strainmerge::Result<()> {
    match command {
        Commands::Extract {
            sources,
            output,
            reports,
        } => {
            let sources = load_sources(&sources)?;
            let json = if reports {
                to_json(&extract_reports(&sources)?)?
            } else {
                to_json(&extract_all(&sources)?)?
            };
            emit(output.as_deref(), &json)
        }

        Commands::Merge {
            target,
            sources,
            output,
        } => {
            let sources = load_sources(&sources)?;
            let target_data = fs::read(&target)?;

            let merged = process(&sources, &target_data)?;

            let out_path = output.unwrap_or_else(default_output_name);
            fs::write(&out_path, merged)?;
            info!("written: {}", out_path.display());
            println!("{}", out_path.display());
            Ok(())
        }
    }
}

/// Read every source workbook, keeping its filename for date labeling.
fn load_sources(paths: &[PathBuf]) -> strainmerge::Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let data = fs::read(path)?;
            Ok(SourceFile::new(name, data))
        })
        .collect()
}

fn to_json<T: serde::Serialize>(value: &T) -> strainmerge::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| MergeError::Write(e.to_string()))
}

fn emit(output: Option<&Path>, json: &str) -> strainmerge::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!("written: {}", path.display());
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!();
        }
    }
    Ok(())
}

/// Default merge output name, dated like the reports it extends.
fn default_output_name() -> PathBuf {
    let today = chrono::Local::now().format("%y%m%d");
    PathBuf::from(format!("merged_{today}.xlsx"))
}
