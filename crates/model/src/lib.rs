//! October Model - Declared elements
//!
//! The element model the generator inspects: type elements, their
//! annotations, an element store with superficial validation, processing
//! rounds, bundled platform classes and the declaration index parser.

pub mod element;
pub mod parser;
pub mod platform;
pub mod round;
pub mod store;

pub use element::{
    AnnotationMirror, AnnotationValue, ClassLiteral, ElementKind, ElementRef, ExecutableElement,
    Modifier, TypeElement, TypeMirror,
};
pub use element::{package_of_name, simple_name_of};
pub use parser::{DeclarationParser, IndexFormat, ParseError};
pub use platform::Platform;
pub use round::RoundEnvironment;
pub use store::ElementStore;

/// Root of every class hierarchy
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
