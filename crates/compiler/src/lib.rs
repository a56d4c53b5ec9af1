//! October Compiler - Component generation
//!
//! Discovers annotated containers and presenters in a processing round,
//! validates them against the framework hierarchy and generates the
//! component graph and initializer for the application.

pub mod annotated;
pub mod discovery;
pub mod generator;
pub mod inspector;
pub mod messager;
pub mod processor;
pub mod rules;
pub mod validator;

pub use annotated::{AnnotatedClass, ApplicationDescriptor, ModuleRef};
pub use discovery::{Binding, ContainerDiscovery, DiscoveryMap, PresenterBinding, PresenterDiscovery};
pub use generator::{
    validate_batch, ApplicationGenerator, ChildGenerator, InjectionDispatch, Packages, RoundState, TierArtifacts,
    TierProgress,
};
pub use inspector::{ChainEnd, Classification, Inspector};
pub use messager::Messager;
pub use processor::{GenerationReport, InitializerRegistry, OctoberProcessor};
pub use rules::{SiblingBase, Suggestion, TierRules};
pub use validator::AnnotationValidator;
