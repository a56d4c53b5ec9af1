//! October command line
//!
//! Generates dependency injection components for an annotated Android
//! project described by a declaration index.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use october::commands::{CheckCommand, GenerateCommand, InitCommand};
use october::VERSION;

/// Top-level CLI parser
#[derive(Debug, Parser)]
#[command(name = "october", version, about = "Generate dependency injection components")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate sources and write them to the output directory
    Generate {
        #[arg(long, default_value = ".")]
        project: PathBuf,
        /// Declaration index, overriding the configured one
        #[arg(long)]
        index: Option<PathBuf>,
        /// Output directory, overriding the configured one
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run generation without writing anything
    Check {
        #[arg(long, default_value = ".")]
        project: PathBuf,
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Write a default october.toml
    Init {
        #[arg(long, default_value = ".")]
        project: PathBuf,
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!("October v{}", VERSION);

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Run a command; `Ok(false)` means errors were reported
async fn run(command: Command) -> Result<bool> {
    match command {
        Command::Generate { project, index, out } => {
            let report = GenerateCommand {
                project_path: project,
                index,
                out_dir: out,
            }
            .execute()
            .await?;
            Ok(!report.has_errors())
        }
        Command::Check { project, index } => {
            let report = CheckCommand {
                project_path: project,
                index,
            }
            .execute()
            .await?;
            Ok(!report.has_errors())
        }
        Command::Init { project, force } => {
            InitCommand {
                project_path: project,
                force,
            }
            .execute()
            .await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from(["october", "generate", "--project", "app", "--out", "gen", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Generate { project, index, out } => {
                assert_eq!(project, PathBuf::from("app"));
                assert!(index.is_none());
                assert_eq!(out, Some(PathBuf::from("gen")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_init_defaults() {
        let cli = Cli::parse_from(["october", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false, .. }));
    }
}
