//! Annotation Validator
//!
//! Fluent accumulator of rule violations for one annotated element. A
//! validator is built for a single chain of checks and never shared.

use indexmap::IndexSet;
use october_core::ValidationError;
use october_model::{ElementKind, ElementRef, Modifier};

use crate::inspector::Inspector;

/// Accumulates error messages for one element and one annotation
pub struct AnnotationValidator<'a> {
    inspector: Inspector<'a>,
    element: ElementRef<'a>,
    /// Simple name of the annotation, as shown in messages
    annotation: String,
    errors: IndexSet<String>,
}

impl<'a> AnnotationValidator<'a> {
    pub fn with(inspector: Inspector<'a>, element: ElementRef<'a>, annotation: impl Into<String>) -> Self {
        Self {
            inspector,
            element,
            annotation: annotation.into(),
            errors: IndexSet::new(),
        }
    }

    fn is_method(&self) -> bool {
        self.element.kind() == ElementKind::Method
    }

    /// Methods must be public or package-private
    pub fn is_accessible(mut self) -> Self {
        let modifiers = self.element.modifiers();
        if self.is_method() && (modifiers.contains(&Modifier::Private) || modifiers.contains(&Modifier::Protected)) {
            let message = format!(
                "{} method is not accessible. It must have public, default or native modifier.",
                self.element.simple_name()
            );
            self.add_error(message);
        }
        self
    }

    /// Methods must be abstract when `required`, and must not be otherwise
    pub fn is_abstract_allowed(mut self, required: bool) -> Self {
        let is_abstract = self.element.modifiers().contains(&Modifier::Abstract);
        if self.is_method() && is_abstract != required {
            let message = if required {
                format!(
                    "{} method is not abstract. Only abstract methods can be annotated with @{}",
                    self.element.simple_name(),
                    self.annotation
                )
            } else {
                format!(
                    "{} method is abstract. You can't annotate abstract methods with @{}",
                    self.element.simple_name(),
                    self.annotation
                )
            };
            self.add_error(message);
        }
        self
    }

    /// Methods must be declared inside an interface when `required`, and outside one otherwise
    pub fn is_interface_allowed(mut self, required: bool) -> Self {
        let Some(enclosing) = self.element.enclosing() else {
            return self;
        };
        let in_interface = enclosing.kind == ElementKind::Interface;
        if self.is_method() && in_interface != required {
            let message = if required {
                format!(
                    "{} class is not an Interface. Only Interface classes can have methods annotated with @{}",
                    enclosing.simple_name(),
                    self.annotation
                )
            } else {
                format!(
                    "{} class is an Interface. You can't annotate Interface methods with @{}",
                    enclosing.simple_name(),
                    self.annotation
                )
            };
            self.add_error(message);
        }
        self
    }

    /// The element must be a class deriving from `superclass`
    pub fn inherits_from_class(mut self, superclass: &str) -> Self {
        match self.element.as_type().filter(|t| t.kind == ElementKind::Class) {
            Some(class) => {
                if !self.inspector.inherits_from_class(class, superclass) {
                    let message = format!(
                        "{} class is annotated with @{} but doesn't inherit from {}",
                        class.simple_name(),
                        self.annotation,
                        superclass
                    );
                    self.add_error(message);
                }
            }
            None => {
                let message = format!("Only classes can be annotated with @{}", self.annotation);
                self.add_error(message);
            }
        }
        self
    }

    fn add_error(&mut self, message: String) {
        self.errors.insert(message);
    }

    pub fn errors(&self) -> &IndexSet<String> {
        &self.errors
    }

    /// Finish the chain, failing with every accumulated message
    pub fn validate(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(
                self.element.display_name(),
                self.errors.into_iter().collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_model::{ElementStore, ExecutableElement, TypeElement, TypeMirror, JAVA_LANG_OBJECT};

    fn store() -> ElementStore {
        let mut store = ElementStore::new();
        store.insert(TypeElement::declare(JAVA_LANG_OBJECT, ElementKind::Class));
        store.insert(TypeElement::class("android.app.Application"));
        store.insert(TypeElement::class("com.example.App").extends(TypeMirror::declared("android.app.Application")));
        store.insert(TypeElement::class("com.example.NotApp"));
        store.insert(TypeElement::interface("com.example.Api"));
        store
    }

    #[test]
    fn test_inherits_from_class() {
        let store = store();
        let inspector = Inspector::new(&store);

        let app = ElementRef::Type(store.get("com.example.App").unwrap());
        assert!(AnnotationValidator::with(inspector, app, "ApplicationComponent")
            .inherits_from_class("android.app.Application")
            .validate()
            .is_ok());

        let not_app = ElementRef::Type(store.get("com.example.NotApp").unwrap());
        let err = AnnotationValidator::with(inspector, not_app, "ApplicationComponent")
            .inherits_from_class("android.app.Application")
            .validate()
            .unwrap_err();
        assert_eq!(err.element, "com.example.NotApp");
        assert_eq!(
            err.messages,
            vec!["NotApp class is annotated with @ApplicationComponent but doesn't inherit from android.app.Application"]
        );

        let api = ElementRef::Type(store.get("com.example.Api").unwrap());
        let err = AnnotationValidator::with(inspector, api, "ApplicationComponent")
            .inherits_from_class("android.app.Application")
            .validate()
            .unwrap_err();
        assert_eq!(err.messages, vec!["Only classes can be annotated with @ApplicationComponent"]);
    }

    #[test]
    fn test_method_checks_accumulate() {
        let store = store();
        let inspector = Inspector::new(&store);
        let owner = store.get("com.example.Api").unwrap();
        let method = ExecutableElement::method("provide")
            .with_modifier(Modifier::Private)
            .with_modifier(Modifier::Abstract);
        let element = ElementRef::Executable { method: &method, enclosing: owner };

        let validator = AnnotationValidator::with(inspector, element, "PerActivity")
            .is_accessible()
            .is_abstract_allowed(false)
            .is_interface_allowed(false)
            .is_accessible();

        let errors: Vec<&str> = validator.errors().iter().map(String::as_str).collect();
        assert_eq!(
            errors,
            vec![
                "provide method is not accessible. It must have public, default or native modifier.",
                "provide method is abstract. You can't annotate abstract methods with @PerActivity",
                "Api class is an Interface. You can't annotate Interface methods with @PerActivity",
            ]
        );
    }

    #[test]
    fn test_method_checks_pass() {
        let store = store();
        let inspector = Inspector::new(&store);
        let owner = store.get("com.example.Api").unwrap();
        let method = ExecutableElement::method("bind").with_modifier(Modifier::Abstract);
        let element = ElementRef::Executable { method: &method, enclosing: owner };

        assert!(AnnotationValidator::with(inspector, element, "Binds")
            .is_accessible()
            .is_abstract_allowed(true)
            .is_interface_allowed(true)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validators_do_not_share_state() {
        let store = store();
        let inspector = Inspector::new(&store);
        let not_app = ElementRef::Type(store.get("com.example.NotApp").unwrap());
        let app = ElementRef::Type(store.get("com.example.App").unwrap());

        let failing = AnnotationValidator::with(inspector, not_app, "ApplicationComponent")
            .inherits_from_class("android.app.Application");
        let passing = AnnotationValidator::with(inspector, app, "ApplicationComponent")
            .inherits_from_class("android.app.Application");

        assert_eq!(failing.errors().len(), 1);
        assert!(passing.validate().is_ok());
    }
}
