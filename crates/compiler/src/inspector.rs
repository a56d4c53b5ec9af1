//! Class Hierarchy Inspector
//!
//! Walks superclass chains and interface closures of declared types.

use std::collections::HashSet;

use october_model::{ElementStore, TypeElement, TypeMirror};

/// How a superclass walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEnd {
    /// The chain reached a class with no superclass
    Root,
    /// The chain hit a type that does not resolve, or looped back on itself
    Unresolved(String),
}

/// Everything discovery needs to know about a candidate, from one walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Qualified names of the superclass chain, nearest first
    pub bases: Vec<String>,
    pub chain_end: ChainEnd,
    pub derives_from_presenter_base: bool,
    /// Declared interface that leads to the presenter contract, when there is one
    pub contract_interface: Option<String>,
}

impl Classification {
    /// The first base in the chain that is one of `names`
    pub fn first_base_in<'a>(&'a self, names: &[&str]) -> Option<&'a str> {
        self.bases
            .iter()
            .map(String::as_str)
            .find(|base| names.contains(base))
    }

    pub fn derives_from(&self, name: &str) -> bool {
        self.bases.iter().any(|base| base == name)
    }
}

/// Hierarchy queries over an element store
#[derive(Clone, Copy)]
pub struct Inspector<'a> {
    store: &'a ElementStore,
}

impl<'a> Inspector<'a> {
    pub fn new(store: &'a ElementStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a ElementStore {
        self.store
    }

    /// Superclass chain of `start`, nearest first, and how the walk ended
    pub fn superclass_chain(&self, start: &TypeElement) -> (Vec<String>, ChainEnd) {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(start.qualified_name.clone());

        let mut current = start;
        loop {
            match &current.superclass {
                TypeMirror::None => return (chain, ChainEnd::Root),
                TypeMirror::Error(name) => return (chain, ChainEnd::Unresolved(name.clone())),
                mirror @ TypeMirror::Declared(name) => {
                    if !visited.insert(name.clone()) {
                        return (chain, ChainEnd::Unresolved(name.clone()));
                    }
                    chain.push(name.clone());
                    match self.store.as_element(mirror) {
                        Some(parent) => current = parent,
                        None => return (chain, ChainEnd::Unresolved(name.clone())),
                    }
                }
            }
        }
    }

    /// Whether `start` derives from the class named `target`
    pub fn inherits_from_class(&self, start: &TypeElement, target: &str) -> bool {
        let (chain, _) = self.superclass_chain(start);
        chain.iter().any(|name| name == target)
    }

    /// Whether the class declares generic type parameters
    pub fn contains_type_parameters(&self, class: &TypeElement) -> bool {
        !class.type_parameters.is_empty()
    }

    /// Depth-first search of `interfaces` and their super-interfaces for the
    /// interface named `target`
    pub fn find_interface(&self, interfaces: &[TypeMirror], target: &str) -> Option<&'a TypeElement> {
        let mut visited = HashSet::new();
        self.search_interfaces(interfaces, target, &mut visited)
    }

    /// The interface among `interfaces` through which `target` is reached
    pub fn find_declaring_interface(&self, interfaces: &[TypeMirror], target: &str) -> Option<&'a TypeElement> {
        let mut visited = HashSet::new();
        interfaces.iter().find_map(|mirror| {
            let interface = self.store.as_element(mirror)?;
            if interface.qualified_name == target
                || self.search_interfaces(&interface.interfaces, target, &mut visited).is_some()
            {
                Some(interface)
            } else {
                None
            }
        })
    }

    fn search_interfaces(
        &self,
        interfaces: &[TypeMirror],
        target: &str,
        visited: &mut HashSet<String>,
    ) -> Option<&'a TypeElement> {
        for mirror in interfaces {
            let Some(interface) = self.store.as_element(mirror) else {
                continue;
            };
            if !visited.insert(interface.qualified_name.clone()) {
                continue;
            }
            if interface.qualified_name == target {
                return Some(interface);
            }
            if let Some(found) = self.search_interfaces(&interface.interfaces, target, visited) {
                return Some(found);
            }
        }
        None
    }

    /// Classify a candidate against the presenter base and contract interface
    pub fn classify(&self, candidate: &TypeElement, presenter_base: &str, contract: &str) -> Classification {
        let (bases, chain_end) = self.superclass_chain(candidate);
        let derives_from_presenter_base = bases.iter().any(|base| base == presenter_base);
        let contract_interface = self
            .find_declaring_interface(&candidate.interfaces, contract)
            .map(|interface| interface.qualified_name.clone());

        Classification {
            bases,
            chain_end,
            derives_from_presenter_base,
            contract_interface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use october_model::{ElementKind, JAVA_LANG_OBJECT};

    const PRESENTER: &str = "com.base.Presenter";
    const CONTRACT: &str = "com.base.Presentable";

    fn store() -> ElementStore {
        let mut store = ElementStore::new();
        store.insert(TypeElement::declare(JAVA_LANG_OBJECT, ElementKind::Class));
        store.insert(TypeElement::class(PRESENTER));
        store.insert(TypeElement::interface(CONTRACT));
        store.insert(TypeElement::interface("com.example.IMainPresenter").implements(TypeMirror::declared(CONTRACT)));
        store.insert(TypeElement::interface("com.example.Unrelated"));
        store.insert(
            TypeElement::class("com.example.MainPresenter")
                .extends(TypeMirror::declared(PRESENTER))
                .implements(TypeMirror::declared("com.example.Unrelated"))
                .implements(TypeMirror::declared("com.example.IMainPresenter")),
        );
        store.insert(
            TypeElement::class("com.example.SpecialPresenter")
                .extends(TypeMirror::declared("com.example.MainPresenter")),
        );
        store
    }

    #[test]
    fn test_inherits_from_class() {
        let store = store();
        let inspector = Inspector::new(&store);
        let special = store.get("com.example.SpecialPresenter").unwrap();

        assert!(inspector.inherits_from_class(special, PRESENTER));
        assert!(inspector.inherits_from_class(special, JAVA_LANG_OBJECT));
        assert!(!inspector.inherits_from_class(special, "com.base.Other"));
        assert!(!inspector.inherits_from_class(special, "com.example.SpecialPresenter"));
    }

    #[test]
    fn test_chain_end_on_missing_and_cyclic_types() {
        let mut store = store();
        store.insert(TypeElement::class("com.example.Broken").extends(TypeMirror::declared("com.example.Missing")));
        store.insert(TypeElement::class("com.example.A").extends(TypeMirror::declared("com.example.B")));
        store.insert(TypeElement::class("com.example.B").extends(TypeMirror::declared("com.example.A")));
        let inspector = Inspector::new(&store);

        let (chain, end) = inspector.superclass_chain(store.get("com.example.Broken").unwrap());
        assert_eq!(chain, vec!["com.example.Missing".to_string()]);
        assert_eq!(end, ChainEnd::Unresolved("com.example.Missing".into()));

        let (_, end) = inspector.superclass_chain(store.get("com.example.A").unwrap());
        assert_eq!(end, ChainEnd::Unresolved("com.example.A".into()));
    }

    #[test]
    fn test_find_interface() {
        let store = store();
        let inspector = Inspector::new(&store);
        let presenter = store.get("com.example.MainPresenter").unwrap();

        let exact = inspector.find_interface(&presenter.interfaces, CONTRACT).unwrap();
        assert_eq!(exact.qualified_name, CONTRACT);

        let declaring = inspector.find_declaring_interface(&presenter.interfaces, CONTRACT).unwrap();
        assert_eq!(declaring.qualified_name, "com.example.IMainPresenter");

        assert!(inspector.find_interface(&presenter.interfaces, "com.base.Nope").is_none());
    }

    #[test]
    fn test_classify() {
        let store = store();
        let inspector = Inspector::new(&store);

        let direct = inspector.classify(store.get("com.example.MainPresenter").unwrap(), PRESENTER, CONTRACT);
        assert!(direct.derives_from_presenter_base);
        assert_eq!(direct.contract_interface.as_deref(), Some("com.example.IMainPresenter"));
        assert_eq!(direct.chain_end, ChainEnd::Root);
        assert_eq!(direct.first_base_in(&[PRESENTER, JAVA_LANG_OBJECT]), Some(PRESENTER));

        // Interfaces declared by superclasses do not count
        let inherited = inspector.classify(store.get("com.example.SpecialPresenter").unwrap(), PRESENTER, CONTRACT);
        assert!(inherited.derives_from_presenter_base);
        assert!(inherited.contract_interface.is_none());
    }

    #[test]
    fn test_contains_type_parameters() {
        let store = store();
        let inspector = Inspector::new(&store);
        let generic = TypeElement::class("com.example.Generic").with_type_parameter("T");
        assert!(inspector.contains_type_parameters(&generic));
        assert!(!inspector.contains_type_parameters(store.get(PRESENTER).unwrap()));
    }
}
