//! CLI commands for October
//!
//! Each command loads the project, runs a generation round and reports the
//! outcome on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use october_compiler::GenerationReport;
use october_core::config::CONFIG_FILE_NAME;
use october_core::{Event, EventBus, OctoberConfig};
use tracing::info;

use crate::project::OctoberProject;

/// Generate command options
pub struct GenerateCommand {
    pub project_path: PathBuf,
    pub index: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl GenerateCommand {
    /// Generate sources and write them below the output directory
    pub async fn execute(&self) -> Result<GenerationReport> {
        let project = OctoberProject::load_with_index(&self.project_path, self.index.clone()).await?;
        let out_dir = self.out_dir.clone().unwrap_or_else(|| project.output_dir());

        let events = Arc::new(EventBus::new());
        let subscription = events.subscribe();
        let mut filer = project.filer();
        let report = project.generate(&mut filer, Some(events));
        print_events(&subscription.drain());

        if report.has_errors() {
            return Ok(report);
        }

        let written = filer
            .write_to_dir(&out_dir)
            .await
            .with_context(|| format!("Failed to write generated sources to {:?}", out_dir))?;
        info!("Wrote {} files to {:?}", written.len(), out_dir);
        for path in &written {
            println!("  {}", path.display());
        }
        Ok(report)
    }
}

/// Check command options
pub struct CheckCommand {
    pub project_path: PathBuf,
    pub index: Option<PathBuf>,
}

impl CheckCommand {
    /// Run generation in memory and list the files it would write
    pub async fn execute(&self) -> Result<GenerationReport> {
        let project = OctoberProject::load_with_index(&self.project_path, self.index.clone()).await?;

        let mut filer = project.filer();
        let report = project.generate(&mut filer, None);
        for diagnostic in &report.diagnostics {
            println!("{}", diagnostic);
        }

        if !report.has_errors() {
            println!("Planned files:");
            for source in filer.sources() {
                println!("  {}", source.path.display());
            }
        }
        Ok(report)
    }
}

/// Init command options
pub struct InitCommand {
    pub project_path: PathBuf,
    pub force: bool,
}

impl InitCommand {
    /// Write the default configuration into the project
    pub async fn execute(&self) -> Result<PathBuf> {
        let path = self.project_path.join(CONFIG_FILE_NAME);
        if !self.force && tokio::fs::try_exists(&path).await? {
            return Err(anyhow::anyhow!(
                "{:?} already exists. Use --force to overwrite it",
                path
            ));
        }

        OctoberConfig::default()
            .save(&path)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("Created {}", path.display());
        Ok(path)
    }
}

fn print_events(events: &[Event]) {
    for event in events {
        match event {
            Event::Diagnostic(diagnostic) => println!("{}", diagnostic),
            Event::FileEmitted { package, name, .. } => info!("Emitted {}.{}", package, name),
            _ => {}
        }
    }
}
