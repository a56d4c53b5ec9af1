//! Discovery
//!
//! Registries filled while walking the annotated candidates of a round.

mod container;
mod presenter;

pub use container::ContainerDiscovery;
pub use presenter::PresenterDiscovery;

use indexmap::IndexMap;
use october_core::{DuplicatePresenterPolicy, ProcessingError};
use october_model::simple_name_of;

use crate::annotated::AnnotatedClass;

/// Insertion-ordered registry of discovered classes, keyed by qualified name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryMap {
    classes: IndexMap<String, AnnotatedClass>,
}

impl DiscoveryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class unless it is already known; returns whether it was added
    pub fn insert_if_absent(&mut self, class: AnnotatedClass) -> bool {
        if self.classes.contains_key(&class.qualified_name) {
            return false;
        }
        self.classes.insert(class.qualified_name.clone(), class);
        true
    }

    pub fn get(&self, qualified_name: &str) -> Option<&AnnotatedClass> {
        self.classes.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.classes.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedClass> {
        self.classes.values()
    }

    pub fn qualified_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

/// Outcome of registering a presenter under its contract interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// First binding for the contract
    Added,
    /// The same presenter was already bound
    Unchanged,
    /// The new presenter replaced an earlier one
    Replaced { previous: String },
    /// An earlier presenter kept the binding
    Kept { existing: String },
}

/// Contract interface to presenter implementation, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenterBinding {
    bindings: IndexMap<String, String>,
}

impl PresenterBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `presenter` to `contract` following the duplicate policy
    pub fn bind(
        &mut self,
        contract: &str,
        presenter: &str,
        policy: DuplicatePresenterPolicy,
    ) -> Result<Binding, ProcessingError> {
        let existing = match self.bindings.get(contract) {
            None => {
                self.bindings.insert(contract.to_string(), presenter.to_string());
                return Ok(Binding::Added);
            }
            Some(existing) if existing == presenter => return Ok(Binding::Unchanged),
            Some(existing) => existing.clone(),
        };

        match policy {
            DuplicatePresenterPolicy::LastWins => {
                self.bindings.insert(contract.to_string(), presenter.to_string());
                Ok(Binding::Replaced { previous: existing })
            }
            DuplicatePresenterPolicy::FirstWins => Ok(Binding::Kept { existing }),
            DuplicatePresenterPolicy::Reject => Err(ProcessingError::new(
                presenter,
                format!(
                    "{} and {} both implement {}. Only one presenter can be bound to a contract interface",
                    simple_name_of(&existing),
                    simple_name_of(presenter),
                    simple_name_of(contract)
                ),
            )),
        }
    }

    /// Presenter bound to a contract interface
    pub fn get(&self, contract: &str) -> Option<&str> {
        self.bindings.get(contract).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// `(contract, presenter)` pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(contract, presenter)| (contract.as_str(), presenter.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_model::TypeElement;

    #[test]
    fn test_insert_if_absent_is_idempotent() {
        let mut map = DiscoveryMap::new();
        let a = AnnotatedClass::new(&TypeElement::class("com.example.A"));
        let b = AnnotatedClass::new(&TypeElement::class("com.example.B"));

        assert!(map.insert_if_absent(a.clone()));
        assert!(map.insert_if_absent(b));
        assert!(!map.insert_if_absent(a));

        assert_eq!(map.len(), 2);
        assert_eq!(map.qualified_names().collect::<Vec<_>>(), vec!["com.example.A", "com.example.B"]);
    }

    #[test]
    fn test_duplicate_policies() {
        let contract = "com.example.IMain";

        let mut last = PresenterBinding::new();
        assert_eq!(last.bind(contract, "com.example.P1", DuplicatePresenterPolicy::LastWins).unwrap(), Binding::Added);
        assert_eq!(
            last.bind(contract, "com.example.P1", DuplicatePresenterPolicy::LastWins).unwrap(),
            Binding::Unchanged
        );
        assert_eq!(
            last.bind(contract, "com.example.P2", DuplicatePresenterPolicy::LastWins).unwrap(),
            Binding::Replaced { previous: "com.example.P1".into() }
        );
        assert_eq!(last.get(contract), Some("com.example.P2"));

        let mut first = PresenterBinding::new();
        first.bind(contract, "com.example.P1", DuplicatePresenterPolicy::FirstWins).unwrap();
        first.bind(contract, "com.example.P2", DuplicatePresenterPolicy::FirstWins).unwrap();
        assert_eq!(first.get(contract), Some("com.example.P1"));

        let mut reject = PresenterBinding::new();
        reject.bind(contract, "com.example.P1", DuplicatePresenterPolicy::Reject).unwrap();
        let err = reject.bind(contract, "com.example.P2", DuplicatePresenterPolicy::Reject).unwrap_err();
        assert_eq!(err.element.as_deref(), Some("com.example.P2"));
        assert_eq!(reject.len(), 1);
    }
}
