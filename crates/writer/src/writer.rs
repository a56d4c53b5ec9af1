//! Java Writer
//!
//! Renders a [`JavaFile`] to Java source, computing imports on the way.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::info;

use crate::code::{CodeArg, CodeBlock};
use crate::name::{ClassName, TypeName};
use crate::spec::{AnnotationSpec, FieldSpec, JavaFile, MethodSpec, Modifier, TypeKind, TypeSpec};

/// Writer errors
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Invalid class name: {0}")]
    InvalidName(String),
    #[error("Invalid code format: {0}")]
    Format(String),
    #[error("File already written: {0}")]
    DuplicateFile(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const JAVA_LANG: &str = "java.lang";

/// Java source writer
pub struct JavaWriter {
    indent: usize,
}

impl JavaWriter {
    /// Create a new writer with default settings
    pub fn new() -> Self {
        Self { indent: 4 }
    }

    /// Set indentation
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }

    /// Render a file to source text
    pub fn write_to_string(&self, file: &JavaFile) -> Result<String, WriteError> {
        if file.type_spec.is_anonymous() || file.type_spec.name.is_empty() {
            return Err(WriteError::Format("a source file needs a named top-level type".into()));
        }

        let names = NameResolver::new(file);
        let mut out = CodeWriter::new(" ".repeat(self.indent), &names);

        if let Some(comment) = &file.file_comment {
            for line in comment.lines() {
                if line.is_empty() {
                    out.emit("//\n");
                } else {
                    out.emit(&format!("// {}\n", line));
                }
            }
        }
        if !file.package.is_empty() {
            out.emit(&format!("package {};\n\n", file.package));
        }
        let mut imports: Vec<String> = names.imports.values().map(ClassName::canonical_name).collect();
        imports.sort();
        if !imports.is_empty() {
            for import in &imports {
                out.emit(&format!("import {};\n", import));
            }
            out.emit("\n");
        }

        out.emit_type(&file.type_spec)?;
        Ok(out.finish())
    }

    /// Render a file and write it to a path
    pub async fn write_to_file(&self, file: &JavaFile, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let source = self.write_to_string(file)?;
        if let Some(parent) = path.as_ref().parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path.as_ref(), source).await?;
        info!("Source written to {:?}", path.as_ref());
        Ok(())
    }
}

impl Default for JavaWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides how each class is spelled inside one file
struct NameResolver {
    package: String,
    /// Imported top-level classes by simple name
    imports: BTreeMap<String, ClassName>,
    /// Simple names shared by more than one referenced class
    ambiguous: BTreeSet<String>,
}

impl NameResolver {
    fn new(file: &JavaFile) -> Self {
        let mut referenced = Vec::new();
        file.type_spec.referenced_classes(&mut referenced);
        referenced.push(file.class_name());

        let mut by_simple_name: BTreeMap<String, BTreeSet<ClassName>> = BTreeMap::new();
        for class in referenced {
            let top = class.top_level();
            by_simple_name
                .entry(top.simple_name().to_string())
                .or_default()
                .insert(top);
        }

        let mut imports = BTreeMap::new();
        let mut ambiguous = BTreeSet::new();
        for (simple_name, classes) in by_simple_name {
            if classes.len() > 1 {
                ambiguous.insert(simple_name);
                continue;
            }
            if let Some(class) = classes.into_iter().next() {
                let package = class.package();
                if package != file.package && package != JAVA_LANG && !package.is_empty() {
                    imports.insert(simple_name, class);
                }
            }
        }

        Self {
            package: file.package.clone(),
            imports,
            ambiguous,
        }
    }

    fn resolve(&self, class: &ClassName) -> String {
        let top = class.top_level();
        let simple = top.simple_name();
        let nested = class.simple_names().join(".");

        if self.imports.get(simple) == Some(&top) {
            return nested;
        }
        if self.ambiguous.contains(simple) || self.imports.contains_key(simple) {
            return class.canonical_name();
        }
        if top.package() == self.package || top.package() == JAVA_LANG {
            return nested;
        }
        class.canonical_name()
    }
}

/// Accumulates output with indentation
struct CodeWriter<'a> {
    out: String,
    indent_unit: String,
    level: usize,
    at_line_start: bool,
    names: &'a NameResolver,
}

impl<'a> CodeWriter<'a> {
    fn new(indent_unit: String, names: &'a NameResolver) -> Self {
        Self {
            out: String::new(),
            indent_unit,
            level: 0,
            at_line_start: true,
            names,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn emit(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.out.push('\n');
                self.at_line_start = true;
                continue;
            }
            if self.at_line_start {
                for _ in 0..self.level {
                    self.out.push_str(&self.indent_unit);
                }
                self.at_line_start = false;
            }
            self.out.push(c);
        }
    }

    fn unindent(&mut self) -> Result<(), WriteError> {
        self.level = self
            .level
            .checked_sub(1)
            .ok_or_else(|| WriteError::Format("unbalanced $<".into()))?;
        Ok(())
    }

    fn type_name(&self, ty: &TypeName) -> String {
        match ty {
            TypeName::Void => "void".to_string(),
            TypeName::Class(class) => self.names.resolve(class),
            TypeName::Parameterized { raw, arguments } => {
                let arguments: Vec<String> = arguments.iter().map(|a| self.type_name(a)).collect();
                format!("{}<{}>", self.names.resolve(raw), arguments.join(", "))
            }
            TypeName::Variable(name) => name.clone(),
            TypeName::Wildcard { upper_bound: None } => "?".to_string(),
            TypeName::Wildcard { upper_bound: Some(bound) } => {
                format!("? extends {}", self.type_name(bound))
            }
        }
    }

    fn emit_modifiers(&mut self, modifiers: &[Modifier], implicit: &[Modifier]) {
        for modifier in modifiers.iter().filter(|m| !implicit.contains(m)) {
            self.emit(modifier.keyword());
            self.emit(" ");
        }
    }

    fn emit_annotation(&mut self, annotation: &AnnotationSpec) -> Result<(), WriteError> {
        let name = self.names.resolve(&annotation.annotation_type);
        self.emit(&format!("@{}", name));
        if annotation.members.is_empty() {
            return Ok(());
        }

        self.emit("(");
        let single_value = annotation.members.len() == 1 && annotation.members.contains_key("value");
        for (i, (member, value)) in annotation.members.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            if !single_value {
                self.emit(&format!("{} = ", member));
            }
            self.emit_code(value)?;
        }
        self.emit(")");
        Ok(())
    }

    fn emit_annotations(&mut self, annotations: &[AnnotationSpec]) -> Result<(), WriteError> {
        for annotation in annotations {
            self.emit_annotation(annotation)?;
            self.emit("\n");
        }
        Ok(())
    }

    fn emit_code(&mut self, block: &CodeBlock) -> Result<(), WriteError> {
        for segment in &block.segments {
            let mut args = segment.args.iter();
            let mut chars = segment.format.chars();

            while let Some(c) = chars.next() {
                if c != '$' {
                    let mut buf = [0u8; 4];
                    self.emit(c.encode_utf8(&mut buf));
                    continue;
                }
                let placeholder = chars
                    .next()
                    .ok_or_else(|| WriteError::Format(format!("dangling $ in {:?}", segment.format)))?;
                match placeholder {
                    '$' => self.emit("$"),
                    '>' => self.level += 1,
                    '<' => self.unindent()?,
                    'T' | 'L' | 'S' | 'N' => {
                        let arg = args.next().ok_or_else(|| {
                            WriteError::Format(format!("missing argument for ${} in {:?}", placeholder, segment.format))
                        })?;
                        self.emit_arg(placeholder, arg)?;
                    }
                    other => {
                        return Err(WriteError::Format(format!("unknown placeholder ${}", other)));
                    }
                }
            }

            if args.next().is_some() {
                return Err(WriteError::Format(format!("unused arguments for {:?}", segment.format)));
            }
        }
        Ok(())
    }

    fn emit_arg(&mut self, placeholder: char, arg: &CodeArg) -> Result<(), WriteError> {
        match (placeholder, arg) {
            ('T', CodeArg::Type(ty)) => {
                let name = self.type_name(ty);
                self.emit(&name);
            }
            ('S', CodeArg::Str(value)) => self.emit(&string_literal(value)),
            ('N', CodeArg::Name(value)) | ('L', CodeArg::Name(value)) | ('L', CodeArg::Literal(value)) => {
                self.emit(value)
            }
            ('L', CodeArg::Block(block)) => self.emit_code(block)?,
            ('L', CodeArg::Anonymous(spec)) => self.emit_type(spec)?,
            (placeholder, arg) => {
                return Err(WriteError::Format(format!(
                    "${} cannot take argument {:?}",
                    placeholder, arg
                )));
            }
        }
        Ok(())
    }

    fn emit_type(&mut self, spec: &TypeSpec) -> Result<(), WriteError> {
        match &spec.kind {
            TypeKind::Anonymous(args) => {
                let supertype = spec
                    .superclass
                    .as_ref()
                    .or_else(|| spec.superinterfaces.first())
                    .ok_or_else(|| WriteError::Format("anonymous class without a supertype".into()))?;
                let supertype = self.type_name(supertype);
                self.emit(&format!("new {}(", supertype));
                self.emit_code(args)?;
                self.emit(") {\n");
            }
            TypeKind::Class | TypeKind::Interface => {
                self.emit_annotations(&spec.annotations)?;
                self.emit_modifiers(&spec.modifiers, &[]);
                let keyword = if spec.is_interface() { "interface" } else { "class" };
                self.emit(&format!("{} {}", keyword, spec.name));

                if let Some(superclass) = &spec.superclass {
                    let name = self.type_name(superclass);
                    self.emit(&format!(" extends {}", name));
                }
                if !spec.superinterfaces.is_empty() {
                    let names: Vec<String> = spec.superinterfaces.iter().map(|t| self.type_name(t)).collect();
                    let keyword = if spec.is_interface() { "extends" } else { "implements" };
                    self.emit(&format!(" {} {}", keyword, names.join(", ")));
                }
                self.emit(" {\n");
            }
        }

        self.level += 1;
        let mut first = true;
        for field in &spec.fields {
            if !first {
                self.emit("\n");
            }
            first = false;
            self.emit_field(field, spec.is_interface())?;
        }
        for method in &spec.methods {
            if !first {
                self.emit("\n");
            }
            first = false;
            self.emit_method(method, spec.is_interface())?;
        }
        self.unindent()?;

        self.emit("}");
        if !spec.is_anonymous() {
            self.emit("\n");
        }
        Ok(())
    }

    fn emit_field(&mut self, field: &FieldSpec, in_interface: bool) -> Result<(), WriteError> {
        let implicit: &[Modifier] = if in_interface {
            &[Modifier::Public, Modifier::Static, Modifier::Final]
        } else {
            &[]
        };
        self.emit_annotations(&field.annotations)?;
        self.emit_modifiers(&field.modifiers, implicit);
        let ty = self.type_name(&field.ty);
        self.emit(&format!("{} {}", ty, field.name));
        if let Some(initializer) = &field.initializer {
            self.emit(" = ");
            self.emit_code(initializer)?;
        }
        self.emit(";\n");
        Ok(())
    }

    fn emit_method(&mut self, method: &MethodSpec, in_interface: bool) -> Result<(), WriteError> {
        let implicit: &[Modifier] = if in_interface {
            &[Modifier::Public, Modifier::Abstract]
        } else {
            &[]
        };
        self.emit_annotations(&method.annotations)?;
        self.emit_modifiers(&method.modifiers, implicit);
        if !method.type_variables.is_empty() {
            self.emit(&format!("<{}> ", method.type_variables.join(", ")));
        }

        let return_type = self.type_name(&method.return_type);
        let parameters: Vec<String> = method
            .parameters
            .iter()
            .map(|p| {
                let modifiers: String = p.modifiers.iter().map(|m| format!("{} ", m.keyword())).collect();
                format!("{}{} {}", modifiers, self.type_name(&p.ty), p.name)
            })
            .collect();
        self.emit(&format!("{} {}({})", return_type, method.name, parameters.join(", ")));

        let has_body = !method.is_abstract()
            && (!in_interface
                || method.modifiers.contains(&Modifier::Default)
                || method.modifiers.contains(&Modifier::Static));
        if !has_body {
            self.emit(";\n");
            return Ok(());
        }

        self.emit(" {\n");
        let level = self.level;
        self.level += 1;
        self.emit_code(&method.code)?;
        if !self.at_line_start {
            self.emit("\n");
        }
        self.unindent()?;
        if self.level != level {
            return Err(WriteError::Format(format!("unbalanced indentation in {}", method.name)));
        }
        self.emit("}\n");
        Ok(())
    }
}

fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\t' => literal.push_str("\\t"),
            '\r' => literal.push_str("\\r"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
