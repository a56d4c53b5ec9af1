//! Declaration Index Parser
//!
//! Loads a declaration index (TOML or JSON) describing the classes of a
//! project: superclass, interfaces, type parameters, modifiers, annotations
//! and methods.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use october_core::OctoberError;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::element::{
    AnnotationMirror, AnnotationValue, ClassLiteral, ElementKind, ExecutableElement, Modifier,
    TypeElement, TypeMirror,
};
use crate::JAVA_LANG_OBJECT;

/// Parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),
    #[error("Class declared twice: {0}")]
    DuplicateDeclaration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for OctoberError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(e) => OctoberError::Io(e),
            other => OctoberError::Config(format!("Invalid declaration index: {}", other)),
        }
    }
}

/// Serialization format of a declaration index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Toml,
    Json,
}

impl IndexFormat {
    /// Pick the format from a file extension, TOML unless it says JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => IndexFormat::Json,
            _ => IndexFormat::Toml,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeclarationIndex {
    #[serde(default, rename = "class")]
    classes: Vec<ClassDecl>,
}

#[derive(Debug, Deserialize)]
struct ClassDecl {
    name: String,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    kind: ElementKind,
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    implements: Vec<String>,
    #[serde(default)]
    type_parameters: Vec<String>,
    #[serde(default = "default_modifiers")]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    annotations: Vec<AnnotationDecl>,
    #[serde(default)]
    methods: Vec<MethodDecl>,
}

#[derive(Debug, Deserialize)]
struct AnnotationDecl {
    #[serde(rename = "type")]
    annotation_type: String,
    #[serde(default)]
    values: IndexMap<String, ValueDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ValueDecl {
    Class {
        class: String,
        #[serde(default)]
        loaded: bool,
    },
    Bool(bool),
    Int(i64),
    String(String),
    Array(Vec<ValueDecl>),
}

#[derive(Debug, Deserialize)]
struct MethodDecl {
    name: String,
    #[serde(default = "default_modifiers")]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    returns: Option<String>,
    #[serde(default)]
    parameters: Vec<ParameterDecl>,
    #[serde(default)]
    annotations: Vec<AnnotationDecl>,
}

#[derive(Debug, Deserialize)]
struct ParameterDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

fn default_modifiers() -> Vec<Modifier> {
    vec![Modifier::Public]
}

/// Declaration index parser
pub struct DeclarationParser;

impl DeclarationParser {
    /// Parse an index file, choosing the format from its extension
    pub async fn parse_file(path: impl AsRef<Path>) -> Result<Vec<TypeElement>, ParseError> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            return Err(ParseError::FileNotFound(path.display().to_string()));
        }
        debug!("Reading declaration index {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_str(&content, IndexFormat::from_path(path))
    }

    /// Parse an index from a string
    pub fn parse_str(content: &str, format: IndexFormat) -> Result<Vec<TypeElement>, ParseError> {
        let index: DeclarationIndex = match format {
            IndexFormat::Toml => toml::from_str(content)?,
            IndexFormat::Json => serde_json::from_str(content)?,
        };

        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(index.classes.len());
        for decl in index.classes {
            let element = Self::convert_class(decl)?;
            if !seen.insert(element.qualified_name.clone()) {
                return Err(ParseError::DuplicateDeclaration(element.qualified_name));
            }
            elements.push(element);
        }

        debug!("Parsed {} declarations", elements.len());
        Ok(elements)
    }

    fn convert_class(decl: ClassDecl) -> Result<TypeElement, ParseError> {
        let name = decl.name.trim();
        if name.is_empty() {
            return Err(ParseError::InvalidDeclaration("class name must not be empty".into()));
        }
        if !decl.kind.is_type() {
            return Err(ParseError::InvalidDeclaration(format!(
                "{} is declared as {:?}, expected a type kind",
                name, decl.kind
            )));
        }

        let mut element = TypeElement::declare(name, decl.kind);
        if let Some(package) = decl.package {
            element = element.in_package(package);
        }

        element.superclass = match decl.extends.as_deref() {
            Some(ty) => parse_type(ty),
            None if decl.kind == ElementKind::Class && name != JAVA_LANG_OBJECT => {
                TypeMirror::declared(JAVA_LANG_OBJECT)
            }
            None => TypeMirror::None,
        };
        if decl.kind == ElementKind::Interface && !element.superclass.is_none() {
            warn!("Interface {} declares a superclass, ignoring it", name);
            element.superclass = TypeMirror::None;
        }

        element.interfaces = decl.implements.iter().map(|ty| parse_type(ty)).collect();
        element.type_parameters = decl.type_parameters;
        element.modifiers = decl.modifiers;
        element.annotations = decl.annotations.into_iter().map(convert_annotation).collect();
        element.methods = decl
            .methods
            .into_iter()
            .map(|method| Self::convert_method(name, method))
            .collect::<Result<_, _>>()?;

        Ok(element)
    }

    fn convert_method(owner: &str, decl: MethodDecl) -> Result<ExecutableElement, ParseError> {
        if decl.name.trim().is_empty() {
            return Err(ParseError::InvalidDeclaration(format!(
                "method of {} has an empty name",
                owner
            )));
        }
        Ok(ExecutableElement {
            name: decl.name,
            kind: ElementKind::Method,
            modifiers: decl.modifiers,
            return_type: decl.returns.as_deref().map(parse_type).unwrap_or_default(),
            parameters: decl
                .parameters
                .into_iter()
                .map(|param| (param.name, parse_type(&param.ty)))
                .collect(),
            annotations: decl.annotations.into_iter().map(convert_annotation).collect(),
        })
    }
}

fn convert_annotation(decl: AnnotationDecl) -> AnnotationMirror {
    AnnotationMirror {
        annotation_type: decl.annotation_type,
        values: decl
            .values
            .into_iter()
            .map(|(member, value)| (member, convert_value(value)))
            .collect(),
    }
}

fn convert_value(decl: ValueDecl) -> AnnotationValue {
    match decl {
        ValueDecl::Class { class, loaded: true } => {
            AnnotationValue::Class(ClassLiteral::loaded(erase_generics(&class)))
        }
        ValueDecl::Class { class, loaded: false } => {
            AnnotationValue::Class(ClassLiteral::Mirrored(parse_type(&class)))
        }
        ValueDecl::Bool(value) => AnnotationValue::Bool(value),
        ValueDecl::Int(value) => AnnotationValue::Int(value),
        ValueDecl::String(value) => AnnotationValue::String(value),
        ValueDecl::Array(values) => AnnotationValue::Array(values.into_iter().map(convert_value).collect()),
    }
}

/// Parse a type reference.
///
/// `void` and the empty string mean no type, an `error:` prefix marks an
/// unresolved type, and type arguments are erased.
pub fn parse_type(text: &str) -> TypeMirror {
    let text = text.trim();
    if text.is_empty() || text == "void" {
        return TypeMirror::None;
    }
    if let Some(name) = text.strip_prefix("error:") {
        return TypeMirror::Error(erase_generics(name).to_string());
    }
    TypeMirror::Declared(erase_generics(text).to_string())
}

fn erase_generics(text: &str) -> &str {
    text.split('<').next().unwrap_or(text).trim()
}
