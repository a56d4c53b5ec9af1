//! Project loading for October
//!
//! Resolves a project directory into its configuration and declaration
//! index, and builds the element store a generation round runs against.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use october_compiler::{GenerationReport, OctoberProcessor};
use october_core::{EventBus, OctoberConfig};
use october_model::{DeclarationParser, ElementStore, Platform, RoundEnvironment, TypeElement};
use october_writer::{Filer, JavaWriter, MemoryFiler};
use tracing::{debug, info};

/// A loaded October project
pub struct OctoberProject {
    root: PathBuf,
    config: OctoberConfig,
    index_file: PathBuf,
    store: ElementStore,
    /// Classes declared by the project itself, in index order
    declared: Vec<String>,
}

impl OctoberProject {
    /// Load a project using the index file named in its configuration
    pub async fn load(root: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_index(root, None).await
    }

    /// Load a project, optionally overriding the declaration index
    pub async fn load_with_index(root: impl AsRef<Path>, index: Option<PathBuf>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        info!("Loading project: {:?}", root);

        let config = OctoberConfig::load(&root)
            .await
            .with_context(|| format!("Failed to load configuration for {:?}", root))?;

        let index_file = index.unwrap_or_else(|| config.generation.index_file.clone());
        let index_file = if index_file.is_absolute() {
            index_file
        } else {
            root.join(index_file)
        };

        let declarations = DeclarationParser::parse_file(&index_file)
            .await
            .with_context(|| format!("Failed to read declaration index {:?}", index_file))?;

        let mut project = Self::from_declarations(root, config, declarations);
        project.index_file = index_file;
        Ok(project)
    }

    /// Build a project from already parsed declarations
    pub fn from_declarations(root: impl Into<PathBuf>, config: OctoberConfig, declarations: Vec<TypeElement>) -> Self {
        let root = root.into();
        let mut store = ElementStore::new();
        Platform::new(&config.framework).install(&mut store);

        let declared = declarations
            .iter()
            .map(|element| element.qualified_name.clone())
            .collect();
        store.extend(declarations);
        debug!("Element store holds {} types", store.len());

        let index_file = root.join(&config.generation.index_file);
        Self {
            root,
            config,
            index_file,
            store,
            declared,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &OctoberConfig {
        &self.config
    }

    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Qualified names of the classes the project declares
    pub fn declared_classes(&self) -> &[String] {
        &self.declared
    }

    /// Default output directory for generated sources
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.generation.output_dir)
    }

    /// The single round a CLI run processes: every declared class is a root
    pub fn round(&self) -> RoundEnvironment<'_> {
        RoundEnvironment::new(&self.store, self.declared.clone())
    }

    /// In-memory filer rendering with the configured indentation
    pub fn filer(&self) -> MemoryFiler {
        MemoryFiler::with_writer(JavaWriter::new().with_indent(self.config.generation.indent))
    }

    /// Run one generation round into `filer`
    pub fn generate(&self, filer: &mut dyn Filer, events: Option<Arc<EventBus>>) -> GenerationReport {
        let mut processor = OctoberProcessor::new(self.config.clone());
        if let Some(events) = events {
            processor = processor.with_events(events);
        }
        processor.process_round(&self.round(), filer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_classes_are_not_roots() {
        let config = OctoberConfig::default();
        let project = OctoberProject::from_declarations(
            "/tmp/app",
            config,
            vec![TypeElement::class("com.example.App")],
        );

        assert_eq!(project.declared_classes(), ["com.example.App".to_string()]);
        assert!(project.store().contains("android.app.Application"));
        assert_eq!(project.round().root_elements(), project.declared_classes());
        assert_eq!(
            project.output_dir(),
            PathBuf::from("/tmp/app/build/generated/source/october")
        );
    }

    #[tokio::test]
    async fn test_missing_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = OctoberProject::load(dir.path()).await.err().unwrap();
        assert!(format!("{:#}", err).contains("october-index.toml"));
    }
}
