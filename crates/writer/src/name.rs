//! Type Names
//!
//! Class names and the type references used by generated declarations.

use std::fmt;

use crate::writer::WriteError;

/// A fully-qualified class name, split into package and simple names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    package: String,
    /// Enclosing classes first, the class itself last
    simple_names: Vec<String>,
}

impl ClassName {
    /// A top-level class in the given package
    pub fn get(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    /// Guess a class name from a canonical name.
    ///
    /// Segments before the first capitalized one form the package; the rest
    /// are enclosing and nested class names. Without a capitalized segment
    /// the last one is the class.
    pub fn best_guess(canonical_name: &str) -> Result<Self, WriteError> {
        let invalid = || WriteError::InvalidName(canonical_name.to_string());

        let segments: Vec<&str> = canonical_name.split('.').collect();
        if segments.iter().any(|s| !is_identifier(s)) {
            return Err(invalid());
        }
        let first_class = segments
            .iter()
            .position(|s| s.chars().next().map_or(false, char::is_uppercase))
            .unwrap_or(segments.len() - 1);

        Ok(Self {
            package: segments[..first_class].join("."),
            simple_names: segments[first_class..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// A class nested inside this one
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple_name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or_default()
    }

    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// The outermost class enclosing this one, or itself
    pub fn top_level(&self) -> ClassName {
        Self::get(self.package.clone(), self.simple_names[0].clone())
    }

    pub fn canonical_name(&self) -> String {
        let nested = self.simple_names.join(".");
        if self.package.is_empty() {
            nested
        } else {
            format!("{}.{}", self.package, nested)
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Any type that can appear in a generated declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Void,
    Class(ClassName),
    Parameterized { raw: ClassName, arguments: Vec<TypeName> },
    Variable(String),
    /// `?`, optionally bounded with `? extends T`
    Wildcard { upper_bound: Option<Box<TypeName>> },
}

impl TypeName {
    pub fn parameterized(raw: ClassName, arguments: Vec<TypeName>) -> Self {
        TypeName::Parameterized { raw, arguments }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeName::Variable(name.into())
    }

    /// The unbounded wildcard `?`
    pub fn wildcard() -> Self {
        TypeName::Wildcard { upper_bound: None }
    }

    pub fn subtype_of(bound: TypeName) -> Self {
        TypeName::Wildcard { upper_bound: Some(Box::new(bound)) }
    }

    /// Every class referenced by this type, in order of appearance
    pub fn referenced_classes(&self, out: &mut Vec<ClassName>) {
        match self {
            TypeName::Void | TypeName::Variable(_) => {}
            TypeName::Class(class) => out.push(class.clone()),
            TypeName::Parameterized { raw, arguments } => {
                out.push(raw.clone());
                for argument in arguments {
                    argument.referenced_classes(out);
                }
            }
            TypeName::Wildcard { upper_bound } => {
                if let Some(bound) = upper_bound {
                    bound.referenced_classes(out);
                }
            }
        }
    }
}

impl From<ClassName> for TypeName {
    fn from(class: ClassName) -> Self {
        TypeName::Class(class)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
