use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use usagelog_lib::settings::{default_settings_path, LoggerSettings, SettingsStore};
use usagelog_lib::storage::{export_logs, list_logs, location, read_log};

/// Inspect and export recorded usage logs.
#[derive(Debug, Parser)]
#[command(name = "usagelog", version, about)]
struct Cli {
    /// Settings file (default: ~/.usagelog/settings.json).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bundle every session log into a zip archive.
    Export {
        /// Destination archive path.
        dest: PathBuf,

        /// Read logs from this directory instead of the configured one.
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// List session logs with their event counts.
    List {
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    usagelog_lib::init_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = SettingsStore::new(cli.settings.unwrap_or_else(default_settings_path))?;
    let settings = store.logger();

    match cli.command {
        Command::Export { dest, log_dir } => {
            let log_dir = log_dir_or_configured(log_dir, &settings);
            let summary = export_logs(&log_dir, &settings.log_extension, &dest)
                .with_context(|| format!("failed to export logs from {}", log_dir.display()))?;
            println!(
                "{} log file(s) written to {}",
                summary.entries.len(),
                summary.path.display()
            );
        }
        Command::List { log_dir } => {
            let log_dir = log_dir_or_configured(log_dir, &settings);
            let logs = list_logs(&log_dir, &settings.log_extension)
                .with_context(|| format!("failed to list {}", log_dir.display()))?;
            for path in logs {
                match read_log(&path) {
                    Ok(records) => println!("{}\t{}", path.display(), records.len()),
                    Err(err) => println!("{}\tunreadable: {err:#}", path.display()),
                }
            }
        }
    }

    Ok(())
}

fn log_dir_or_configured(log_dir: Option<PathBuf>, settings: &LoggerSettings) -> PathBuf {
    log_dir.unwrap_or_else(|| location::resolve_log_dir(settings))
}
