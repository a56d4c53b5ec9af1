//! Container Discovery
//!
//! Finds the activity-like or fragment-like classes of one tier.

use october_core::{FrameworkNames, ProcessingError};
use october_model::{ElementKind, ElementRef};
use tracing::debug;

use super::DiscoveryMap;
use crate::annotated::AnnotatedClass;
use crate::inspector::{ChainEnd, Inspector};
use crate::messager::Messager;
use crate::rules::TierRules;

/// Walks container candidates and records the ones reaching an accepted base
pub struct ContainerDiscovery<'a> {
    inspector: Inspector<'a>,
    names: &'a FrameworkNames,
    rules: TierRules,
    containers: DiscoveryMap,
}

impl<'a> ContainerDiscovery<'a> {
    pub fn new(inspector: Inspector<'a>, names: &'a FrameworkNames, rules: TierRules) -> Self {
        Self {
            inspector,
            names,
            rules,
            containers: DiscoveryMap::new(),
        }
    }

    /// Discover containers among `candidates`.
    ///
    /// The first malformed candidate fails the whole batch. Candidates that
    /// cannot be checked are skipped with a warning.
    pub fn process(&mut self, candidates: &[ElementRef<'a>], messager: &mut Messager) -> Result<(), ProcessingError> {
        for candidate in candidates {
            self.process_candidate(candidate, messager)?;
        }
        Ok(())
    }

    fn process_candidate(&mut self, candidate: &ElementRef<'a>, messager: &mut Messager) -> Result<(), ProcessingError> {
        let Some(class) = candidate.as_type().filter(|t| t.kind == ElementKind::Class) else {
            return Err(ProcessingError::new(
                candidate.display_name(),
                format!("Only classes can be annotated with @{}", self.rules.annotation_name()),
            ));
        };

        if !self.inspector.store().validate_element(class) {
            messager.warning(self.rules.skipped_message(class.simple_name()), Some(&class.qualified_name));
            return Ok(());
        }

        if self.inspector.contains_type_parameters(class) {
            return Err(ProcessingError::new(
                class.qualified_name.clone(),
                format!(
                    "Classes with Type Parameters cannot be annotated with @{}",
                    self.rules.annotation_name()
                ),
            ));
        }

        let classification = self
            .inspector
            .classify(class, &self.names.presenter_base, &self.names.presentable);

        for base in &classification.bases {
            if self.rules.accepts(base) {
                let annotated = AnnotatedClass::new(class);
                if self.containers.insert_if_absent(annotated) {
                    debug!("{} container discovered: {}", self.rules.tier.name(), class.qualified_name);
                    messager.note(format!("Processing class {}", class.simple_name()), None);
                }
                return Ok(());
            }
            if let Some(sibling) = self.rules.sibling(base) {
                return Err(ProcessingError::new(
                    class.qualified_name.clone(),
                    self.rules.misannotation_message(class.simple_name(), sibling),
                ));
            }
        }

        match classification.chain_end {
            ChainEnd::Root => Err(ProcessingError::new(
                class.qualified_name.clone(),
                self.rules.missing_base_message(class.simple_name()),
            )),
            ChainEnd::Unresolved(name) => {
                debug!("Superclass chain of {} stops at {}", class.qualified_name, name);
                messager.warning(self.rules.skipped_message(class.simple_name()), Some(&class.qualified_name));
                Ok(())
            }
        }
    }

    pub fn containers(&self) -> &DiscoveryMap {
        &self.containers
    }

    pub fn into_containers(self) -> DiscoveryMap {
        self.containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_core::{DiagnosticKind, OctoberConfig};
    use october_model::{
        AnnotationMirror, ElementStore, ExecutableElement, Platform, RoundEnvironment, TypeElement, TypeMirror,
    };

    const FRAGMENT: &str = "com.kuassivi.october.annotation.FragmentComponent";
    const ACTIVITY: &str = "com.kuassivi.october.annotation.ActivityComponent";

    fn store(config: &OctoberConfig) -> ElementStore {
        let mut store = ElementStore::new();
        Platform::new(&config.framework).install(&mut store);
        store
    }

    fn fragment(name: &str, superclass: &str) -> TypeElement {
        TypeElement::class(name)
            .extends(TypeMirror::declared(superclass))
            .annotated(AnnotationMirror::new(FRAGMENT))
    }

    fn discover(
        config: &OctoberConfig,
        store: &ElementStore,
        rules: TierRules,
        annotation: &str,
        roots: &[&str],
        messager: &mut Messager,
    ) -> Result<DiscoveryMap, ProcessingError> {
        let round = RoundEnvironment::new(store, roots.iter().map(|r| r.to_string()).collect());
        let mut discovery = ContainerDiscovery::new(Inspector::new(store), &config.framework, rules);
        discovery.process(&round.elements_annotated_with(annotation), messager)?;
        Ok(discovery.into_containers())
    }

    #[test]
    fn test_fragment_extending_fragment_base() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(fragment("com.example.A", &config.framework.fragment_base));
        store.insert(fragment("com.example.Nested", "com.example.A"));

        let mut messager = Messager::new();
        let map = discover(
            &config,
            &store,
            TierRules::fragment(&config),
            FRAGMENT,
            &["com.example.A", "com.example.Nested", "com.example.A"],
            &mut messager,
        )
        .unwrap();

        assert_eq!(map.qualified_names().collect::<Vec<_>>(), vec!["com.example.A", "com.example.Nested"]);
        assert_eq!(messager.of_kind(DiagnosticKind::Note).count(), 2);
        assert!(!messager.has_errors());
    }

    #[test]
    fn test_fragment_extending_activity_base_is_misannotated() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(fragment("com.example.B", &config.framework.activity_base));

        let err = discover(
            &config,
            &store,
            TierRules::fragment(&config),
            FRAGMENT,
            &["com.example.B"],
            &mut Messager::new(),
        )
        .unwrap_err();

        assert_eq!(err.element.as_deref(), Some("com.example.B"));
        assert!(err.message.ends_with("B class must be annotated with @ActivityComponent"));
    }

    #[test]
    fn test_activity_accepts_compat_base_and_rejects_presenters() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(
            TypeElement::class("com.example.Compat")
                .extends(TypeMirror::declared(config.framework.compat_activity_base.clone()))
                .annotated(AnnotationMirror::new(ACTIVITY)),
        );
        store.insert(
            TypeElement::class("com.example.Presenter")
                .extends(TypeMirror::declared(config.framework.presenter_base.clone()))
                .annotated(AnnotationMirror::new(ACTIVITY)),
        );

        let mut messager = Messager::new();
        let map = discover(&config, &store, TierRules::activity(&config), ACTIVITY, &["com.example.Compat"], &mut messager)
            .unwrap();
        assert!(map.contains("com.example.Compat"));

        let err = discover(&config, &store, TierRules::activity(&config), ACTIVITY, &["com.example.Presenter"], &mut messager)
            .unwrap_err();
        assert!(err.message.contains("Presenters must be annotated with @PerActivity or @PerFragment"));
    }

    #[test]
    fn test_chain_reaching_root_is_an_error() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(TypeElement::class("com.example.Plain").annotated(AnnotationMirror::new(FRAGMENT)));

        let err = discover(
            &config,
            &store,
            TierRules::fragment(&config),
            FRAGMENT,
            &["com.example.Plain"],
            &mut Messager::new(),
        )
        .unwrap_err();
        assert_eq!(err.message, "Plain must inherit from OctoberFragment");
    }

    #[test]
    fn test_unresolvable_candidate_is_skipped_with_warning() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(fragment("com.example.Broken", "com.example.generated.Missing"));
        store.insert(fragment("com.example.A", &config.framework.fragment_base));

        let mut messager = Messager::new();
        let map = discover(
            &config,
            &store,
            TierRules::fragment(&config),
            FRAGMENT,
            &["com.example.Broken", "com.example.A"],
            &mut messager,
        )
        .unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.contains("com.example.A"));
        let warnings: Vec<_> = messager.of_kind(DiagnosticKind::Warning).collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].element.as_deref(), Some("com.example.Broken"));
        assert_eq!(
            warnings[0].message,
            "Skipped Broken.class because is annotated with @FragmentComponent but it doesn't inherit from OctoberFragment"
        );
    }

    #[test]
    fn test_non_class_and_generic_candidates() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(TypeElement::interface("com.example.Api").annotated(AnnotationMirror::new(FRAGMENT)));
        store.insert(fragment("com.example.Generic", &config.framework.fragment_base).with_type_parameter("T"));
        store.insert(
            TypeElement::class("com.example.Host")
                .with_method(ExecutableElement::method("build").annotated(AnnotationMirror::new(FRAGMENT))),
        );

        for (root, expected) in [
            ("com.example.Api", "Only classes can be annotated with @FragmentComponent"),
            ("com.example.Host", "Only classes can be annotated with @FragmentComponent"),
            ("com.example.Generic", "Classes with Type Parameters cannot be annotated with @FragmentComponent"),
        ] {
            let err = discover(&config, &store, TierRules::fragment(&config), FRAGMENT, &[root], &mut Messager::new())
                .unwrap_err();
            assert_eq!(err.message, expected);
        }
    }
}
