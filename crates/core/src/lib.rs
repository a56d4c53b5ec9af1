//! October Core - Shared types
//!
//! Configuration, error types, diagnostics and the event bus used by every
//! stage of the component generator.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;

pub use config::{DuplicatePresenterPolicy, FrameworkNames, GenerationConfig, NamingConfig, OctoberConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{OctoberError, ProcessingError, Result, ValidationError};
pub use events::{Event, EventBus, EventSubscription, Tier};

/// October version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
