//! Presenter Discovery
//!
//! Binds scoped presenters to the contract interface they declare.

use october_core::{DuplicatePresenterPolicy, FrameworkNames, ProcessingError, Tier};
use october_model::{simple_name_of, ElementKind, ElementRef};
use tracing::debug;

use super::{Binding, PresenterBinding};
use crate::inspector::Inspector;
use crate::messager::Messager;

pub struct PresenterDiscovery<'a> {
    inspector: Inspector<'a>,
    names: &'a FrameworkNames,
    tier: Tier,
    policy: DuplicatePresenterPolicy,
    presenters: PresenterBinding,
}

impl<'a> PresenterDiscovery<'a> {
    pub fn new(inspector: Inspector<'a>, names: &'a FrameworkNames, tier: Tier) -> Self {
        Self {
            inspector,
            names,
            tier,
            policy: DuplicatePresenterPolicy::default(),
            presenters: PresenterBinding::new(),
        }
    }

    /// Set the policy applied when two presenters declare the same contract
    pub fn with_policy(mut self, policy: DuplicatePresenterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bind every presenter among `candidates`.
    ///
    /// Scoped classes that are not presenters are ignored.
    pub fn process(&mut self, candidates: &[ElementRef<'a>], messager: &mut Messager) -> Result<(), ProcessingError> {
        for candidate in candidates {
            let Some(class) = candidate.as_type().filter(|t| t.kind == ElementKind::Class) else {
                continue;
            };

            if !self.inspector.store().validate_element(class) {
                messager.warning(
                    format!(
                        "Skipped {}.class because its hierarchy cannot be resolved",
                        class.simple_name()
                    ),
                    Some(&class.qualified_name),
                );
                continue;
            }

            let classification = self
                .inspector
                .classify(class, &self.names.presenter_base, &self.names.presentable);
            if !classification.derives_from_presenter_base {
                continue;
            }

            let Some(contract) = classification.contract_interface else {
                return Err(ProcessingError::new(
                    class.qualified_name.clone(),
                    format!(
                        "{} must contain an interface that inherits from {}",
                        class.simple_name(),
                        simple_name_of(&self.names.presentable)
                    ),
                ));
            };

            match self.presenters.bind(&contract, &class.qualified_name, self.policy)? {
                Binding::Added => {
                    debug!("{} presenter discovered: {} -> {}", self.tier.name(), contract, class.qualified_name);
                    messager.note(format!("Processing class {}", class.simple_name()), None);
                }
                Binding::Unchanged => {}
                Binding::Replaced { previous } => {
                    messager.warning(
                        format!(
                            "{} replaces {} as the presenter bound to {}",
                            class.simple_name(),
                            simple_name_of(&previous),
                            simple_name_of(&contract)
                        ),
                        Some(&class.qualified_name),
                    );
                    messager.note(format!("Processing class {}", class.simple_name()), None);
                }
                Binding::Kept { existing } => {
                    messager.warning(
                        format!(
                            "{} is ignored because {} is already bound to {}",
                            class.simple_name(),
                            simple_name_of(&existing),
                            simple_name_of(&contract)
                        ),
                        Some(&class.qualified_name),
                    );
                }
            }
        }
        Ok(())
    }

    pub fn into_presenters(self) -> PresenterBinding {
        self.presenters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_core::{DiagnosticKind, OctoberConfig};
    use october_model::{AnnotationMirror, ElementStore, Platform, RoundEnvironment, TypeElement, TypeMirror};

    const PER_ACTIVITY: &str = "com.kuassivi.october.annotation.PerActivity";

    fn store(config: &OctoberConfig) -> ElementStore {
        let names = &config.framework;
        let mut store = ElementStore::new();
        Platform::new(names).install(&mut store);
        store.insert(TypeElement::interface("com.example.IMain").implements(TypeMirror::declared(names.presentable.clone())));
        store.insert(
            TypeElement::class("com.example.MainPresenter")
                .extends(TypeMirror::declared(names.presenter_base.clone()))
                .implements(TypeMirror::declared("com.example.IMain"))
                .annotated(AnnotationMirror::new(PER_ACTIVITY)),
        );
        store
    }

    fn discover(
        config: &OctoberConfig,
        store: &ElementStore,
        roots: &[&str],
        policy: DuplicatePresenterPolicy,
        messager: &mut Messager,
    ) -> Result<PresenterBinding, ProcessingError> {
        let round = RoundEnvironment::new(store, roots.iter().map(|r| r.to_string()).collect());
        let mut discovery =
            PresenterDiscovery::new(Inspector::new(store), &config.framework, Tier::Activity).with_policy(policy);
        discovery.process(&round.elements_annotated_with(PER_ACTIVITY), messager)?;
        Ok(discovery.into_presenters())
    }

    #[test]
    fn test_presenter_bound_to_contract() {
        let config = OctoberConfig::default();
        let store = store(&config);
        let mut messager = Messager::new();

        let binding = discover(&config, &store, &["com.example.MainPresenter"], Default::default(), &mut messager).unwrap();
        assert_eq!(binding.get("com.example.IMain"), Some("com.example.MainPresenter"));
        assert_eq!(messager.diagnostics()[0].message, "Processing class MainPresenter");
    }

    #[test]
    fn test_missing_contract_is_an_error() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(
            TypeElement::class("com.example.Bare")
                .extends(TypeMirror::declared(config.framework.presenter_base.clone()))
                .annotated(AnnotationMirror::new(PER_ACTIVITY)),
        );

        let err = discover(&config, &store, &["com.example.Bare"], Default::default(), &mut Messager::new()).unwrap_err();
        assert_eq!(err.element.as_deref(), Some("com.example.Bare"));
        assert_eq!(err.message, "Bare must contain an interface that inherits from Presentable");
    }

    #[test]
    fn test_unrelated_scoped_classes_are_ignored() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(TypeElement::class("com.example.Repository").annotated(AnnotationMirror::new(PER_ACTIVITY)));
        store.insert(TypeElement::interface("com.example.Scoped").annotated(AnnotationMirror::new(PER_ACTIVITY)));

        let mut messager = Messager::new();
        let binding = discover(
            &config,
            &store,
            &["com.example.Repository", "com.example.Scoped"],
            Default::default(),
            &mut messager,
        )
        .unwrap();
        assert!(binding.is_empty());
        assert!(messager.diagnostics().is_empty());
    }

    #[test]
    fn test_duplicate_contract_warns() {
        let config = OctoberConfig::default();
        let mut store = store(&config);
        store.insert(
            TypeElement::class("com.example.OtherPresenter")
                .extends(TypeMirror::declared(config.framework.presenter_base.clone()))
                .implements(TypeMirror::declared("com.example.IMain"))
                .annotated(AnnotationMirror::new(PER_ACTIVITY)),
        );
        let roots = ["com.example.MainPresenter", "com.example.OtherPresenter"];

        let mut messager = Messager::new();
        let binding = discover(&config, &store, &roots, DuplicatePresenterPolicy::LastWins, &mut messager).unwrap();
        assert_eq!(binding.get("com.example.IMain"), Some("com.example.OtherPresenter"));
        let warning = messager.of_kind(DiagnosticKind::Warning).next().unwrap();
        assert_eq!(warning.message, "OtherPresenter replaces MainPresenter as the presenter bound to IMain");

        let mut messager = Messager::new();
        let binding = discover(&config, &store, &roots, DuplicatePresenterPolicy::FirstWins, &mut messager).unwrap();
        assert_eq!(binding.get("com.example.IMain"), Some("com.example.MainPresenter"));
        let warning = messager.of_kind(DiagnosticKind::Warning).next().unwrap();
        assert_eq!(warning.message, "OtherPresenter is ignored because MainPresenter is already bound to IMain");
        assert_eq!(warning.element.as_deref(), Some("com.example.OtherPresenter"));
        assert_eq!(messager.of_kind(DiagnosticKind::Note).count(), 1);

        let err = discover(&config, &store, &roots, DuplicatePresenterPolicy::Reject, &mut Messager::new()).unwrap_err();
        assert_eq!(err.element.as_deref(), Some("com.example.OtherPresenter"));
    }
}
