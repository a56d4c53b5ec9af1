//! Code Blocks
//!
//! Fragments of method bodies built from format strings with placeholders:
//!
//! | Placeholder | Argument |
//! |-------------|----------|
//! | `$T` | a type, imported when possible |
//! | `$L` | a literal, a nested code block or an anonymous class |
//! | `$S` | a string, emitted as a quoted Java string literal |
//! | `$N` | a name |
//! | `$>` / `$<` | indent / unindent |
//! | `$$` | a literal dollar sign |

use crate::name::{ClassName, TypeName};
use crate::spec::TypeSpec;

/// A single placeholder argument
#[derive(Debug, Clone, PartialEq)]
pub enum CodeArg {
    Type(TypeName),
    Literal(String),
    Str(String),
    Name(String),
    Block(CodeBlock),
    Anonymous(Box<TypeSpec>),
}

/// Argument for `$T`
pub fn ty(ty: impl Into<TypeName>) -> CodeArg {
    CodeArg::Type(ty.into())
}

/// Argument for `$L`
pub fn lit(value: impl ToString) -> CodeArg {
    CodeArg::Literal(value.to_string())
}

/// Argument for `$S`
pub fn string(value: impl Into<String>) -> CodeArg {
    CodeArg::Str(value.into())
}

/// Argument for `$N`
pub fn name(value: impl Into<String>) -> CodeArg {
    CodeArg::Name(value.into())
}

/// A format string together with its arguments
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment {
    pub(crate) format: String,
    pub(crate) args: Vec<CodeArg>,
}

/// A fragment of code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBlock {
    pub(crate) segments: Vec<Segment>,
}

impl CodeBlock {
    pub fn builder() -> CodeBlockBuilder {
        CodeBlockBuilder::default()
    }

    /// A block with a single format string
    pub fn of(format: &str, args: Vec<CodeArg>) -> Self {
        Self::builder().add(format, args).build()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.format.is_empty())
    }

    /// Every class referenced through `$T` arguments, nested blocks and anonymous classes
    pub(crate) fn referenced_classes(&self, out: &mut Vec<ClassName>) {
        for arg in self.segments.iter().flat_map(|s| s.args.iter()) {
            match arg {
                CodeArg::Type(ty) => ty.referenced_classes(out),
                CodeArg::Block(block) => block.referenced_classes(out),
                CodeArg::Anonymous(spec) => spec.referenced_classes(out),
                CodeArg::Literal(_) | CodeArg::Str(_) | CodeArg::Name(_) => {}
            }
        }
    }
}

/// Builder for [`CodeBlock`]
#[derive(Debug, Clone, Default)]
pub struct CodeBlockBuilder {
    segments: Vec<Segment>,
}

impl CodeBlockBuilder {
    /// Append a format string as-is
    pub fn add(mut self, format: &str, args: Vec<CodeArg>) -> Self {
        self.segments.push(Segment {
            format: format.to_string(),
            args,
        });
        self
    }

    /// Append a statement terminated by `;` and a newline
    pub fn add_statement(self, format: &str, args: Vec<CodeArg>) -> Self {
        self.add(&format!("{};\n", format), args)
    }

    /// Open a control flow block such as `if (...) {`
    pub fn begin_control_flow(self, format: &str, args: Vec<CodeArg>) -> Self {
        self.add(&format!("{} {{\n$>", format), args)
    }

    /// Close the current control flow block and open a chained one, e.g. `} else {`
    pub fn next_control_flow(self, format: &str, args: Vec<CodeArg>) -> Self {
        self.add(&format!("$<}} {} {{\n$>", format), args)
    }

    pub fn end_control_flow(self) -> Self {
        self.add("$<}\n", Vec::new())
    }

    pub fn indent(self) -> Self {
        self.add("$>", Vec::new())
    }

    pub fn unindent(self) -> Self {
        self.add("$<", Vec::new())
    }

    /// Append every segment of another block
    pub fn add_block(mut self, block: CodeBlock) -> Self {
        self.segments.extend(block.segments);
        self
    }

    pub fn build(self) -> CodeBlock {
        CodeBlock {
            segments: self.segments,
        }
    }
}
