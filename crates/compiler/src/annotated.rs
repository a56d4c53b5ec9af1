//! Annotated Classes
//!
//! Records for discovered classes and the application root.

use october_core::{OctoberError, ProcessingError, Result};
use october_model::{simple_name_of, AnnotationMirror, ClassLiteral, ElementStore, TypeElement, TypeMirror};
use october_writer::ClassName;

/// A discovered class, identified by qualified and simple name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotatedClass {
    pub qualified_name: String,
    pub simple_name: String,
    pub package: String,
}

impl AnnotatedClass {
    pub fn new(element: &TypeElement) -> Self {
        Self {
            qualified_name: element.qualified_name.clone(),
            simple_name: element.simple_name().to_string(),
            package: element.package.clone(),
        }
    }

    /// Class name for generated code, keeping nested classes intact
    pub fn class_name(&self) -> ClassName {
        let relative = if self.package.is_empty() {
            self.qualified_name.as_str()
        } else {
            self.qualified_name
                .strip_prefix(self.package.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .filter(|rest| !rest.is_empty())
                .unwrap_or(&self.simple_name)
        };

        let mut segments = relative.split('.');
        let outer = segments.next().unwrap_or(relative);
        segments.fold(ClassName::get(self.package.clone(), outer), |name, nested| name.nested(nested))
    }

    /// Runtime name of the class, with `$` between nested class names
    pub fn binary_name(&self) -> String {
        let class_name = self.class_name();
        let nested = class_name.simple_names().join("$");
        if class_name.package().is_empty() {
            nested
        } else {
            format!("{}.{}", class_name.package(), nested)
        }
    }
}

/// A module class named by the application root annotation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleRef {
    pub qualified_name: String,
    pub simple_name: String,
}

impl ModuleRef {
    /// Resolve a class literal, recovering the name from the type mirror when
    /// the class itself is not available
    pub fn resolve(store: &ElementStore, literal: Option<&ClassLiteral>) -> Self {
        match literal {
            Some(ClassLiteral::Loaded { canonical_name, simple_name }) => Self {
                qualified_name: canonical_name.clone(),
                simple_name: simple_name.clone(),
            },
            Some(ClassLiteral::Mirrored(mirror @ TypeMirror::Declared(name))) => match store.as_element(mirror) {
                Some(element) => Self {
                    qualified_name: element.qualified_name.clone(),
                    simple_name: element.simple_name().to_string(),
                },
                None => Self {
                    qualified_name: name.clone(),
                    simple_name: simple_name_of(name).to_string(),
                },
            },
            Some(ClassLiteral::Mirrored(_)) | None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.qualified_name.trim().is_empty()
    }

    pub fn class_name(&self) -> Result<ClassName> {
        ClassName::best_guess(&self.qualified_name).map_err(|e| OctoberError::Emit(e.to_string()))
    }
}

/// The single application root and the three modules it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDescriptor {
    pub class: AnnotatedClass,
    pub application_module: ModuleRef,
    pub activity_module: ModuleRef,
    pub fragment_module: ModuleRef,
}

impl ApplicationDescriptor {
    /// Read the module references from the root annotation
    pub fn new(
        store: &ElementStore,
        element: &TypeElement,
        annotation: &AnnotationMirror,
    ) -> std::result::Result<Self, ProcessingError> {
        let module = |member: &str| ModuleRef::resolve(store, annotation.class_value(member));
        let descriptor = Self {
            class: AnnotatedClass::new(element),
            application_module: module("application"),
            activity_module: module("activity"),
            fragment_module: module("fragment"),
        };

        if descriptor.application_module.is_empty()
            || descriptor.activity_module.is_empty()
            || descriptor.fragment_module.is_empty()
        {
            return Err(ProcessingError::new(
                element.qualified_name.clone(),
                format!(
                    "Some arguments in @{} for class {} are null or empty! \
                     You must provide Application, Activity and Fragment modules.",
                    simple_name_of(&annotation.annotation_type),
                    element.qualified_name
                ),
            ));
        }
        Ok(descriptor)
    }

    pub fn package(&self) -> &str {
        &self.class.package
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_model::AnnotationValue;

    const ROOT: &str = "com.kuassivi.october.annotation.ApplicationComponent";

    fn annotation(application: ClassLiteral, activity: ClassLiteral, fragment: Option<ClassLiteral>) -> AnnotationMirror {
        let mut mirror = AnnotationMirror::new(ROOT)
            .with_value("application", AnnotationValue::Class(application))
            .with_value("activity", AnnotationValue::Class(activity));
        if let Some(fragment) = fragment {
            mirror = mirror.with_value("fragment", AnnotationValue::Class(fragment));
        }
        mirror
    }

    #[test]
    fn test_loaded_and_mirrored_literals() {
        let mut store = ElementStore::new();
        store.insert(TypeElement::class("com.example.di.FragmentModule"));
        let app = TypeElement::class("com.example.App");

        let mirror = annotation(
            ClassLiteral::loaded("com.example.di.ApplicationModule"),
            ClassLiteral::Mirrored(TypeMirror::declared("com.example.di.ActivityModule")),
            Some(ClassLiteral::Mirrored(TypeMirror::declared("com.example.di.FragmentModule"))),
        );
        let descriptor = ApplicationDescriptor::new(&store, &app, &mirror).unwrap();

        assert_eq!(descriptor.application_module.simple_name, "ApplicationModule");
        assert_eq!(descriptor.activity_module.qualified_name, "com.example.di.ActivityModule");
        assert_eq!(descriptor.activity_module.simple_name, "ActivityModule");
        assert_eq!(descriptor.fragment_module.simple_name, "FragmentModule");
        assert_eq!(descriptor.package(), "com.example");
    }

    #[test]
    fn test_missing_module_is_processing_error() {
        let store = ElementStore::new();
        let app = TypeElement::class("com.example.App");

        let mirror = annotation(
            ClassLiteral::loaded("com.example.di.ApplicationModule"),
            ClassLiteral::Mirrored(TypeMirror::Error("Unknown".into())),
            None,
        );
        let err = ApplicationDescriptor::new(&store, &app, &mirror).unwrap_err();
        assert_eq!(err.element.as_deref(), Some("com.example.App"));
        assert!(err.message.starts_with("Some arguments in @ApplicationComponent for class com.example.App"));
    }

    #[test]
    fn test_nested_class_name() {
        let element = TypeElement::class("com.example.Screens.Main");
        let class = AnnotatedClass::new(&element);
        assert_eq!(class.class_name().simple_names(), &["Screens".to_string(), "Main".to_string()]);
        assert_eq!(class.class_name().canonical_name(), "com.example.Screens.Main");
        assert_eq!(class.binary_name(), "com.example.Screens$Main");

        let unnamed = AnnotatedClass::new(&TypeElement::class("App"));
        assert_eq!(unnamed.class_name().canonical_name(), "App");
    }

    #[test]
    fn test_lowercase_class_name() {
        let class = AnnotatedClass::new(&TypeElement::class("com.example.ui.listFragment"));
        assert_eq!(class.package, "com.example.ui");
        assert_eq!(class.class_name().package(), "com.example.ui");
        assert_eq!(class.class_name().simple_names(), &["listFragment".to_string()]);
        assert_eq!(class.binary_name(), "com.example.ui.listFragment");

        // A declared package that is not a prefix keeps only the simple name
        let moved = AnnotatedClass::new(&TypeElement::class("com.example.myApp").in_package("org.other"));
        assert_eq!(moved.class_name().canonical_name(), "org.other.myApp");
    }
}
