//! Declaration Specs
//!
//! Abstract descriptions of the types to emit: annotations, fields,
//! parameters, methods, types and whole source files. Each spec is built
//! once, bottom-up, and then handed to the [`JavaWriter`](crate::JavaWriter).

use indexmap::IndexMap;

use crate::code::{CodeArg, CodeBlock};
use crate::name::{ClassName, TypeName};

/// Java modifiers, in the order they are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

fn add_modifiers(target: &mut Vec<Modifier>, modifiers: &[Modifier]) {
    for modifier in modifiers {
        if !target.contains(modifier) {
            target.push(*modifier);
        }
    }
    target.sort();
}

/// An annotation with its members
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSpec {
    pub annotation_type: ClassName,
    pub members: IndexMap<String, CodeBlock>,
}

impl AnnotationSpec {
    pub fn new(annotation_type: ClassName) -> Self {
        Self {
            annotation_type,
            members: IndexMap::new(),
        }
    }

    pub fn add_member(mut self, name: impl Into<String>, format: &str, args: Vec<CodeArg>) -> Self {
        self.members.insert(name.into(), CodeBlock::of(format, args));
        self
    }
}

/// A field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub ty: TypeName,
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationSpec>,
    pub initializer: Option<CodeBlock>,
}

impl FieldSpec {
    pub fn new(ty: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            initializer: None,
        }
    }

    pub fn add_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        add_modifiers(&mut self.modifiers, modifiers);
        self
    }

    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn initializer(mut self, format: &str, args: Vec<CodeArg>) -> Self {
        self.initializer = Some(CodeBlock::of(format, args));
        self
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub ty: TypeName,
    pub name: String,
    pub modifiers: Vec<Modifier>,
}

impl ParameterSpec {
    pub fn new(ty: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn add_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        add_modifiers(&mut self.modifiers, modifiers);
        self
    }
}

/// A method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationSpec>,
    pub type_variables: Vec<String>,
    pub return_type: TypeName,
    pub parameters: Vec<ParameterSpec>,
    pub code: CodeBlock,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_variables: Vec::new(),
            return_type: TypeName::Void,
            parameters: Vec::new(),
            code: CodeBlock::default(),
        }
    }

    pub fn add_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        add_modifiers(&mut self.modifiers, modifiers);
        self
    }

    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn add_type_variable(mut self, name: impl Into<String>) -> Self {
        self.type_variables.push(name.into());
        self
    }

    pub fn returns(mut self, ty: impl Into<TypeName>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn add_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn add_code(mut self, block: CodeBlock) -> Self {
        self.code = CodeBlock::builder().add_block(self.code).add_block(block).build();
        self
    }

    /// Whether the method is declared without a body
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }
}

/// What kind of type a [`TypeSpec`] declares
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Class,
    Interface,
    /// An anonymous class instantiated with the given constructor arguments
    Anonymous(CodeBlock),
}

/// A type declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub kind: TypeKind,
    /// Empty for anonymous classes
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationSpec>,
    pub superclass: Option<TypeName>,
    pub superinterfaces: Vec<TypeName>,
    pub fields: Vec<FieldSpec>,
    pub methods: Vec<MethodSpec>,
}

impl TypeSpec {
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Class, name.into())
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(TypeKind::Interface, name.into())
    }

    /// An anonymous class; its supertype is the single superclass or superinterface
    pub fn anonymous(constructor_args: CodeBlock) -> Self {
        Self::with_kind(TypeKind::Anonymous(constructor_args), String::new())
    }

    fn with_kind(kind: TypeKind, name: String) -> Self {
        Self {
            kind,
            name,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            superclass: None,
            superinterfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn add_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        add_modifiers(&mut self.modifiers, modifiers);
        self
    }

    pub fn add_annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn superclass(mut self, ty: impl Into<TypeName>) -> Self {
        self.superclass = Some(ty.into());
        self
    }

    pub fn add_superinterface(mut self, ty: impl Into<TypeName>) -> Self {
        self.superinterfaces.push(ty.into());
        self
    }

    pub fn add_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn add_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self.kind, TypeKind::Anonymous(_))
    }

    /// Methods with the given name, in declaration order
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSpec> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Every class this declaration refers to
    pub(crate) fn referenced_classes(&self, out: &mut Vec<ClassName>) {
        let annotation_classes = |annotations: &[AnnotationSpec], out: &mut Vec<ClassName>| {
            for annotation in annotations {
                out.push(annotation.annotation_type.clone());
                for value in annotation.members.values() {
                    value.referenced_classes(out);
                }
            }
        };

        if let TypeKind::Anonymous(args) = &self.kind {
            args.referenced_classes(out);
        }
        annotation_classes(&self.annotations, out);
        if let Some(superclass) = &self.superclass {
            superclass.referenced_classes(out);
        }
        for interface in &self.superinterfaces {
            interface.referenced_classes(out);
        }
        for field in &self.fields {
            annotation_classes(&field.annotations, out);
            field.ty.referenced_classes(out);
            if let Some(initializer) = &field.initializer {
                initializer.referenced_classes(out);
            }
        }
        for method in &self.methods {
            annotation_classes(&method.annotations, out);
            method.return_type.referenced_classes(out);
            for parameter in &method.parameters {
                parameter.ty.referenced_classes(out);
            }
            method.code.referenced_classes(out);
        }
    }
}

/// A source file holding one top-level type
#[derive(Debug, Clone, PartialEq)]
pub struct JavaFile {
    pub package: String,
    pub type_spec: TypeSpec,
    pub file_comment: Option<String>,
}

impl JavaFile {
    pub fn new(package: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self {
            package: package.into(),
            type_spec,
            file_comment: None,
        }
    }

    pub fn with_file_comment(mut self, comment: impl Into<String>) -> Self {
        self.file_comment = Some(comment.into());
        self
    }

    /// The class name of the declared type
    pub fn class_name(&self) -> ClassName {
        ClassName::get(self.package.clone(), self.type_spec.name.clone())
    }

    /// Path of the file relative to a source root
    pub fn relative_path(&self) -> std::path::PathBuf {
        let mut path: std::path::PathBuf = self.package.split('.').filter(|s| !s.is_empty()).collect();
        path.push(format!("{}.java", self.type_spec.name));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_sorted_and_deduplicated() {
        let method = MethodSpec::new("inject")
            .add_modifiers(&[Modifier::Abstract, Modifier::Public])
            .add_modifiers(&[Modifier::Public]);
        assert_eq!(method.modifiers, vec![Modifier::Public, Modifier::Abstract]);
        assert!(method.is_abstract());
    }

    #[test]
    fn test_relative_path() {
        let file = JavaFile::new("com.example.internal.october.di", TypeSpec::class("PresenterActivityInjector"));
        assert_eq!(
            file.relative_path(),
            std::path::PathBuf::from("com/example/internal/october/di/PresenterActivityInjector.java")
        );

        let unnamed = JavaFile::new("", TypeSpec::interface("Api"));
        assert_eq!(unnamed.relative_path(), std::path::PathBuf::from("Api.java"));
    }

    #[test]
    fn test_methods_named() {
        let spec = TypeSpec::interface("Component")
            .add_method(MethodSpec::new("inject"))
            .add_method(MethodSpec::new("apply"))
            .add_method(MethodSpec::new("inject"));
        assert_eq!(spec.methods_named("inject").count(), 2);
    }
}
