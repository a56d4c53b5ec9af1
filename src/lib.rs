//! October - Dependency injection component generator
//!
//! Reads the annotated containers, presenters and application class of an
//! Android project and generates the component graph wiring them together.
//!
//! ## Architecture
//!
//! - `october-core`: configuration, errors, diagnostics and events
//! - `october-model`: declared elements, element store, declaration index
//! - `october-writer`: Java source model, renderer and filer
//! - `october-compiler`: discovery, validation and generation

pub mod commands;
pub mod project;

// Re-export main components for library usage
pub use october_compiler as compiler;
pub use october_core as core;
pub use october_model as model;
pub use october_writer as writer;

pub use october_core::VERSION;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::project::OctoberProject;
    pub use october_compiler::{GenerationReport, InitializerRegistry, OctoberProcessor};
    pub use october_core::{Diagnostic, DiagnosticKind, Event, EventBus, OctoberConfig, OctoberError};
    pub use october_model::{DeclarationParser, ElementStore, RoundEnvironment};
    pub use october_writer::{Filer, JavaWriter, MemoryFiler};
}
