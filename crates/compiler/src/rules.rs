//! Tier Rules
//!
//! Which base classes a container tier accepts, which bases mark a
//! misannotation, and which annotations a tier reads.

use october_core::{OctoberConfig, Tier};
use october_model::simple_name_of;

/// What a misannotated container is told to do instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Use the container annotation of another tier (simple name)
    Annotation(String),
    /// Presenters are picked up through the scoped markers
    ScopedMarkers { per_activity: String, per_fragment: String },
}

/// A base class that belongs to a different kind of class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingBase {
    pub qualified_name: String,
    pub suggestion: Suggestion,
}

/// Discovery rules of one container tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierRules {
    pub tier: Tier,
    /// Marker annotation of containers in this tier
    pub container_annotation: String,
    /// Marker annotation of scoped classes in this tier
    pub scope_annotation: String,
    /// Any of these ends a successful walk
    pub accepted_bases: Vec<String>,
    pub siblings: Vec<SiblingBase>,
}

impl TierRules {
    /// Activities derive from the plain or the AppCompat activity base
    pub fn activity(config: &OctoberConfig) -> Self {
        let names = &config.framework;
        Self {
            tier: Tier::Activity,
            container_annotation: names.activity_component.clone(),
            scope_annotation: names.per_activity.clone(),
            accepted_bases: vec![names.activity_base.clone(), names.compat_activity_base.clone()],
            siblings: vec![
                SiblingBase {
                    qualified_name: names.fragment_base.clone(),
                    suggestion: Suggestion::Annotation(simple_name_of(&names.fragment_component).to_string()),
                },
                Self::presenter_sibling(config),
            ],
        }
    }

    pub fn fragment(config: &OctoberConfig) -> Self {
        let names = &config.framework;
        let activity_annotation = simple_name_of(&names.activity_component).to_string();
        Self {
            tier: Tier::Fragment,
            container_annotation: names.fragment_component.clone(),
            scope_annotation: names.per_fragment.clone(),
            accepted_bases: vec![names.fragment_base.clone()],
            siblings: vec![
                SiblingBase {
                    qualified_name: names.activity_base.clone(),
                    suggestion: Suggestion::Annotation(activity_annotation.clone()),
                },
                SiblingBase {
                    qualified_name: names.compat_activity_base.clone(),
                    suggestion: Suggestion::Annotation(activity_annotation),
                },
                Self::presenter_sibling(config),
            ],
        }
    }

    fn presenter_sibling(config: &OctoberConfig) -> SiblingBase {
        let names = &config.framework;
        SiblingBase {
            qualified_name: names.presenter_base.clone(),
            suggestion: Suggestion::ScopedMarkers {
                per_activity: simple_name_of(&names.per_activity).to_string(),
                per_fragment: simple_name_of(&names.per_fragment).to_string(),
            },
        }
    }

    /// Simple name of the container annotation, as shown in messages
    pub fn annotation_name(&self) -> &str {
        simple_name_of(&self.container_annotation)
    }

    /// The accepted bases by simple name, e.g. `OctoberActivity or OctoberCompatActivity`
    pub fn expected_bases(&self) -> String {
        self.accepted_bases
            .iter()
            .map(|base| simple_name_of(base))
            .collect::<Vec<_>>()
            .join(" or ")
    }

    pub fn accepts(&self, base: &str) -> bool {
        self.accepted_bases.iter().any(|accepted| accepted == base)
    }

    pub fn sibling(&self, base: &str) -> Option<&SiblingBase> {
        self.siblings.iter().find(|sibling| sibling.qualified_name == base)
    }

    /// Error for a container whose chain reaches a sibling base first
    pub fn misannotation_message(&self, class_simple_name: &str, sibling: &SiblingBase) -> String {
        let head = format!(
            "{} class is annotated with @{} but does not inherit from {}.",
            class_simple_name,
            self.annotation_name(),
            self.expected_bases()
        );
        match &sibling.suggestion {
            Suggestion::Annotation(annotation) => {
                format!("{} {} class must be annotated with @{}", head, class_simple_name, annotation)
            }
            Suggestion::ScopedMarkers { per_activity, per_fragment } => format!(
                "{} Presenters must be annotated with @{} or @{}",
                head, per_activity, per_fragment
            ),
        }
    }

    /// Error for a container whose chain ends without any accepted base
    pub fn missing_base_message(&self, class_simple_name: &str) -> String {
        format!("{} must inherit from {}", class_simple_name, self.expected_bases())
    }

    /// Warning for a container that cannot be checked and is left out
    pub fn skipped_message(&self, class_simple_name: &str) -> String {
        format!(
            "Skipped {}.class because is annotated with @{} but it doesn't inherit from {}",
            class_simple_name,
            self.annotation_name(),
            self.expected_bases()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_rules() {
        let config = OctoberConfig::default();
        let rules = TierRules::activity(&config);

        assert!(rules.accepts("com.kuassivi.october.mvp.OctoberActivity"));
        assert!(rules.accepts("com.kuassivi.october.mvp.OctoberCompatActivity"));
        assert!(!rules.accepts("com.kuassivi.october.mvp.OctoberFragment"));
        assert_eq!(rules.expected_bases(), "OctoberActivity or OctoberCompatActivity");
        assert_eq!(rules.annotation_name(), "ActivityComponent");
    }

    #[test]
    fn test_misannotation_messages() {
        let config = OctoberConfig::default();
        let rules = TierRules::fragment(&config);

        let activity = rules.sibling("com.kuassivi.october.mvp.OctoberActivity").unwrap();
        assert_eq!(
            rules.misannotation_message("B", activity),
            "B class is annotated with @FragmentComponent but does not inherit from OctoberFragment. \
             B class must be annotated with @ActivityComponent"
        );

        let presenter = rules.sibling("com.kuassivi.october.mvp.OctoberPresenter").unwrap();
        assert_eq!(
            rules.misannotation_message("P", presenter),
            "P class is annotated with @FragmentComponent but does not inherit from OctoberFragment. \
             Presenters must be annotated with @PerActivity or @PerFragment"
        );

        assert_eq!(rules.missing_base_message("C"), "C must inherit from OctoberFragment");
        assert!(rules.sibling("android.app.Fragment").is_none());
    }
}
