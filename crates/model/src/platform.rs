//! Platform Classes
//!
//! Installs the framework classes user code extends, so hierarchy walks over
//! declared classes end at a real root.

use october_core::FrameworkNames;
use tracing::debug;

use crate::element::{ElementKind, Modifier, TypeElement, TypeMirror};
use crate::store::ElementStore;
use crate::JAVA_LANG_OBJECT;

const ANDROID_ACTIVITY: &str = "android.app.Activity";
const ANDROID_FRAGMENT: &str = "android.app.Fragment";
const APPCOMPAT_ACTIVITY: &str = "android.support.v7.app.AppCompatActivity";

/// Bundled framework class declarations
pub struct Platform<'a> {
    names: &'a FrameworkNames,
}

impl<'a> Platform<'a> {
    pub fn new(names: &'a FrameworkNames) -> Self {
        Self { names }
    }

    /// Every platform class, in dependency order
    pub fn classes(&self) -> Vec<TypeElement> {
        let n = self.names;
        let object = TypeMirror::declared(JAVA_LANG_OBJECT);
        let declared = |name: &str| TypeMirror::declared(name);

        let mut classes = vec![
            TypeElement::declare(JAVA_LANG_OBJECT, ElementKind::Class),
            TypeElement::class(ANDROID_ACTIVITY),
            TypeElement::class(ANDROID_FRAGMENT),
            TypeElement::class(APPCOMPAT_ACTIVITY).extends(declared(ANDROID_ACTIVITY)),
            TypeElement::class(&n.application_base),
            TypeElement::interface(&n.viewable),
            TypeElement::interface(&n.presentable).with_type_parameter("V"),
            TypeElement::interface(&n.activity_interface),
            TypeElement::interface(&n.fragment_interface),
            abstract_class(&n.activity_base, declared(ANDROID_ACTIVITY))
                .with_type_parameter("P")
                .implements(declared(&n.activity_interface))
                .implements(declared(&n.viewable)),
            abstract_class(&n.compat_activity_base, declared(APPCOMPAT_ACTIVITY))
                .with_type_parameter("P")
                .implements(declared(&n.activity_interface))
                .implements(declared(&n.viewable)),
            abstract_class(&n.fragment_base, declared(ANDROID_FRAGMENT))
                .with_type_parameter("P")
                .implements(declared(&n.fragment_interface))
                .implements(declared(&n.viewable)),
            abstract_class(&n.presenter_base, object).with_type_parameter("V"),
        ];

        for annotation in n.supported_annotations() {
            classes.push(TypeElement::declare(annotation, ElementKind::Annotation));
        }
        classes
    }

    /// Install every platform class into a store
    pub fn install(&self, store: &mut ElementStore) {
        let classes = self.classes();
        debug!("Installing {} platform classes", classes.len());
        store.extend(classes);
    }
}

fn abstract_class(name: &str, superclass: TypeMirror) -> TypeElement {
    TypeElement::declare(name, ElementKind::Class)
        .extends(superclass)
        .with_modifier(Modifier::Abstract)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_classes_validate() {
        let names = FrameworkNames::default();
        let mut store = ElementStore::new();
        Platform::new(&names).install(&mut store);

        for name in [
            names.activity_base.as_str(),
            names.compat_activity_base.as_str(),
            names.fragment_base.as_str(),
            names.presenter_base.as_str(),
            names.application_base.as_str(),
        ] {
            let element = store.get(name).unwrap();
            assert!(store.validate_element(element), "{} should validate", name);
        }
        assert!(store.get(&names.activity_component).is_some());
    }
}
