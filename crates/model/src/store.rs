//! Element Store
//!
//! Insertion-ordered registry of every type element known to a processing run.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::element::{ElementKind, TypeElement, TypeMirror};

/// Registry of type elements keyed by qualified name
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: IndexMap<String, TypeElement>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element, replacing any previous declaration of the same name
    pub fn insert(&mut self, element: TypeElement) -> Option<TypeElement> {
        trace!("Registering element {}", element.qualified_name);
        self.elements.insert(element.qualified_name.clone(), element)
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = TypeElement>) {
        for element in elements {
            self.insert(element);
        }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&TypeElement> {
        self.elements.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.elements.contains_key(qualified_name)
    }

    /// Resolve a declared type to its element
    pub fn as_element(&self, mirror: &TypeMirror) -> Option<&TypeElement> {
        mirror.name().and_then(|name| self.get(name))
    }

    /// Package of an element, empty for the unnamed package
    pub fn package_of<'a>(&self, element: &'a TypeElement) -> &'a str {
        &element.package
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeElement> {
        self.elements.values()
    }

    /// Superficial validation of an element.
    ///
    /// An element is valid when its superclass chain and its interface closure
    /// resolve completely to known elements of the right kind, its method
    /// signatures contain no unresolved types, and no cycle is found.
    pub fn validate_element(&self, element: &TypeElement) -> bool {
        let mut visited = HashSet::new();
        let valid = self.validate_type(element, &mut visited);
        if !valid {
            debug!("Element {} failed superficial validation", element.qualified_name);
        }
        valid
    }

    fn validate_type<'a>(&'a self, element: &'a TypeElement, visited: &mut HashSet<&'a str>) -> bool {
        if !visited.insert(element.qualified_name.as_str()) {
            // Either a cycle or an interface reached twice through a diamond
            return !self.has_cycle(element);
        }

        let methods_ok = element.methods.iter().all(|method| {
            !method.return_type.is_error() && method.parameters.iter().all(|(_, ty)| !ty.is_error())
        });
        if !methods_ok {
            return false;
        }

        match &element.superclass {
            TypeMirror::None => {}
            TypeMirror::Error(_) => return false,
            mirror @ TypeMirror::Declared(_) => match self.as_element(mirror) {
                Some(parent) if parent.kind == ElementKind::Class => {
                    if !self.validate_type(parent, visited) {
                        return false;
                    }
                }
                _ => return false,
            },
        }

        element.interfaces.iter().all(|mirror| match self.as_element(mirror) {
            Some(interface) if interface.kind == ElementKind::Interface => {
                self.validate_type(interface, visited)
            }
            _ => false,
        })
    }

    /// Whether the element can reach itself through superclasses or interfaces
    fn has_cycle(&self, element: &TypeElement) -> bool {
        let mut stack: Vec<&TypeElement> = self.direct_supertypes(element).collect();
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current.qualified_name == element.qualified_name {
                return true;
            }
            if seen.insert(current.qualified_name.as_str()) {
                stack.extend(self.direct_supertypes(current));
            }
        }
        false
    }

    fn direct_supertypes<'a>(&'a self, element: &'a TypeElement) -> impl Iterator<Item = &'a TypeElement> + 'a {
        std::iter::once(&element.superclass)
            .chain(element.interfaces.iter())
            .filter_map(move |mirror| self.as_element(mirror))
    }
}
