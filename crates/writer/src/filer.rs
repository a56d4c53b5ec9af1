//! Filer
//!
//! The emission backend generated files are handed to.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::spec::JavaFile;
use crate::writer::{JavaWriter, WriteError};

/// Accepts finished source files, one write per type
pub trait Filer {
    /// Render and record a file; writing the same type twice is an error
    fn write(&mut self, file: &JavaFile) -> Result<PathBuf, WriteError>;
}

/// A rendered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub package: String,
    pub name: String,
    /// Path relative to the output root
    pub path: PathBuf,
    pub source: String,
}

/// Filer that keeps rendered sources in memory until flushed
pub struct MemoryFiler {
    writer: JavaWriter,
    sources: IndexMap<PathBuf, GeneratedSource>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::with_writer(JavaWriter::new())
    }

    pub fn with_writer(writer: JavaWriter) -> Self {
        Self {
            writer,
            sources: IndexMap::new(),
        }
    }

    /// Sources in the order they were written
    pub fn sources(&self) -> impl Iterator<Item = &GeneratedSource> {
        self.sources.values()
    }

    /// Look a source up by package and type name
    pub fn get(&self, package: &str, name: &str) -> Option<&GeneratedSource> {
        self.sources
            .values()
            .find(|source| source.package == package && source.name == name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Write every source below an output directory
    pub async fn write_to_dir(&self, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, WriteError> {
        let out_dir = out_dir.as_ref();
        let mut written = Vec::with_capacity(self.sources.len());

        for source in self.sources.values() {
            let path = out_dir.join(&source.path);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &source.source).await?;
            debug!("Wrote {:?}", path);
            written.push(path);
        }

        info!("{} generated sources written to {:?}", written.len(), out_dir);
        Ok(written)
    }
}

impl Default for MemoryFiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Filer for MemoryFiler {
    fn write(&mut self, file: &JavaFile) -> Result<PathBuf, WriteError> {
        let path = file.relative_path();
        if self.sources.contains_key(&path) {
            return Err(WriteError::DuplicateFile(file.class_name().canonical_name()));
        }

        let source = self.writer.write_to_string(file)?;
        self.sources.insert(
            path.clone(),
            GeneratedSource {
                package: file.package.clone(),
                name: file.type_spec.name.clone(),
                path: path.clone(),
                source,
            },
        );
        Ok(path)
    }
}
