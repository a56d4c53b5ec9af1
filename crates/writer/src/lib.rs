//! October Writer - Java source emission
//!
//! Describes generated types as values (`JavaFile`, `TypeSpec`, `MethodSpec`,
//! ...), renders them to Java source with computed imports and hands the
//! result to a `Filer`.

pub mod code;
pub mod filer;
pub mod name;
pub mod spec;
pub mod writer;

pub use code::{CodeArg, CodeBlock, CodeBlockBuilder};
pub use filer::{Filer, GeneratedSource, MemoryFiler};
pub use name::{ClassName, TypeName};
pub use spec::{
    AnnotationSpec, FieldSpec, JavaFile, MethodSpec, Modifier, ParameterSpec, TypeKind, TypeSpec,
};
pub use writer::{JavaWriter, WriteError};
