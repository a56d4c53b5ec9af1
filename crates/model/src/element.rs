//! Element Model
//!
//! Declared program elements: type elements with their superclass, interfaces,
//! type parameters, modifiers, annotations and methods.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a declared element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Method,
    Constructor,
    Field,
}

impl ElementKind {
    /// Whether this kind declares a type
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation
        )
    }
}

/// Declaration modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Native,
}

/// A reference to a type as seen from a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeMirror {
    /// No type, e.g. the superclass of `java.lang.Object` or of an interface
    #[default]
    None,
    /// A declared class or interface, by qualified name
    Declared(String),
    /// A type that could not be resolved
    Error(String),
}

impl TypeMirror {
    pub fn declared(name: impl Into<String>) -> Self {
        TypeMirror::Declared(name.into())
    }

    /// Qualified name of a declared type
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeMirror::Declared(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TypeMirror::None)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeMirror::Error(_))
    }
}

/// A class literal inside an annotation value.
///
/// Classes already compiled are available directly; classes still being
/// compiled in the same round can only be seen through their type mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLiteral {
    Loaded { canonical_name: String, simple_name: String },
    Mirrored(TypeMirror),
}

impl ClassLiteral {
    /// Build a loaded literal from a canonical name
    pub fn loaded(canonical_name: impl Into<String>) -> Self {
        let canonical_name = canonical_name.into();
        let simple_name = simple_name_of(&canonical_name).to_string();
        ClassLiteral::Loaded { canonical_name, simple_name }
    }
}

/// Value of a single annotation member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationValue {
    String(String),
    Bool(bool),
    Int(i64),
    Class(ClassLiteral),
    Array(Vec<AnnotationValue>),
}

/// An annotation applied to an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMirror {
    /// Qualified name of the annotation type
    pub annotation_type: String,
    pub values: IndexMap<String, AnnotationValue>,
}

impl AnnotationMirror {
    pub fn new(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, member: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(member.into(), value);
        self
    }

    pub fn value(&self, member: &str) -> Option<&AnnotationValue> {
        self.values.get(member)
    }

    /// Class literal held by a member, if the member is a class value
    pub fn class_value(&self, member: &str) -> Option<&ClassLiteral> {
        match self.values.get(member) {
            Some(AnnotationValue::Class(literal)) => Some(literal),
            _ => None,
        }
    }
}

/// A method or constructor declared by a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableElement {
    pub name: String,
    pub kind: ElementKind,
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeMirror,
    pub parameters: Vec<(String, TypeMirror)>,
    pub annotations: Vec<AnnotationMirror>,
}

impl ExecutableElement {
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Method,
            modifiers: Vec::new(),
            return_type: TypeMirror::None,
            parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn annotation(&self, annotation_type: &str) -> Option<&AnnotationMirror> {
        self.annotations.iter().find(|a| a.annotation_type == annotation_type)
    }
}

/// A declared class, interface, enum or annotation type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeElement {
    pub qualified_name: String,
    /// Package the type is declared in, empty for the unnamed package
    pub package: String,
    pub kind: ElementKind,
    pub modifiers: Vec<Modifier>,
    pub superclass: TypeMirror,
    pub interfaces: Vec<TypeMirror>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<AnnotationMirror>,
    pub methods: Vec<ExecutableElement>,
}

impl TypeElement {
    /// A class extending `java.lang.Object`, package inferred from the name
    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::declare(qualified_name, ElementKind::Class)
            .extends(TypeMirror::declared(crate::JAVA_LANG_OBJECT))
    }

    /// An interface, package inferred from the name
    pub fn interface(qualified_name: impl Into<String>) -> Self {
        Self::declare(qualified_name, ElementKind::Interface)
    }

    /// A bare declaration of the given kind with no superclass
    pub fn declare(qualified_name: impl Into<String>, kind: ElementKind) -> Self {
        let qualified_name = qualified_name.into();
        let package = package_of_name(&qualified_name).to_string();
        Self {
            qualified_name,
            package,
            kind,
            modifiers: vec![Modifier::Public],
            superclass: TypeMirror::None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn extends(mut self, superclass: TypeMirror) -> Self {
        self.superclass = superclass;
        self
    }

    pub fn implements(mut self, interface: TypeMirror) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, method: ExecutableElement) -> Self {
        self.methods.push(method);
        self
    }

    /// Name relative to the package; nested types keep their outer names
    pub fn relative_name(&self) -> &str {
        if self.package.is_empty() {
            &self.qualified_name
        } else {
            self.qualified_name
                .strip_prefix(&self.package)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(&self.qualified_name)
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.qualified_name)
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn annotation(&self, annotation_type: &str) -> Option<&AnnotationMirror> {
        self.annotations.iter().find(|a| a.annotation_type == annotation_type)
    }

    pub fn is_annotated_with(&self, annotation_type: &str) -> bool {
        self.annotation(annotation_type).is_some()
    }
}

/// A borrowed view of any element a marker annotation can sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Type(&'a TypeElement),
    Executable {
        method: &'a ExecutableElement,
        enclosing: &'a TypeElement,
    },
}

impl<'a> ElementRef<'a> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Type(element) => element.kind,
            ElementRef::Executable { method, .. } => method.kind,
        }
    }

    pub fn simple_name(&self) -> &'a str {
        match self {
            ElementRef::Type(element) => element.simple_name(),
            ElementRef::Executable { method, .. } => &method.name,
        }
    }

    /// Name used to attach diagnostics to this element
    pub fn display_name(&self) -> String {
        match self {
            ElementRef::Type(element) => element.qualified_name.clone(),
            ElementRef::Executable { method, enclosing } => {
                format!("{}#{}", enclosing.qualified_name, method.name)
            }
        }
    }

    pub fn modifiers(&self) -> &'a [Modifier] {
        match self {
            ElementRef::Type(element) => &element.modifiers,
            ElementRef::Executable { method, .. } => &method.modifiers,
        }
    }

    /// The enclosing type of a method, none for top-level types
    pub fn enclosing(&self) -> Option<&'a TypeElement> {
        match self {
            ElementRef::Type(_) => None,
            ElementRef::Executable { enclosing, .. } => Some(enclosing),
        }
    }

    pub fn as_type(&self) -> Option<&'a TypeElement> {
        match self {
            ElementRef::Type(element) => Some(element),
            ElementRef::Executable { .. } => None,
        }
    }
}

/// Last dot-separated segment of a qualified name
pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name.rsplit('.').next().unwrap_or(qualified_name)
}

/// Guess the package of a qualified name: the segments before the first
/// capitalized one, or every segment but the last when none is capitalized
pub fn package_of_name(qualified_name: &str) -> &str {
    let mut end = 0;
    for segment in qualified_name.split('.') {
        if segment.chars().next().map_or(false, char::is_uppercase) {
            return qualified_name[..end].trim_end_matches('.');
        }
        end += segment.len() + 1;
    }
    qualified_name.rsplit_once('.').map_or("", |(package, _)| package)
}
