//! Round Environment
//!
//! One processing round: the root elements handed to the generator and
//! queries over the annotations placed on them.

use indexmap::IndexSet;

use crate::element::ElementRef;
use crate::store::ElementStore;

/// The elements of a single processing round
#[derive(Debug, Clone)]
pub struct RoundEnvironment<'a> {
    store: &'a ElementStore,
    root_elements: Vec<String>,
    processing_over: bool,
}

impl<'a> RoundEnvironment<'a> {
    /// A round over the given root elements, in declaration order
    pub fn new(store: &'a ElementStore, root_elements: Vec<String>) -> Self {
        Self {
            store,
            root_elements,
            processing_over: false,
        }
    }

    /// The last round, carrying no new root elements
    pub fn final_round(store: &'a ElementStore) -> Self {
        Self {
            store,
            root_elements: Vec::new(),
            processing_over: true,
        }
    }

    pub fn store(&self) -> &'a ElementStore {
        self.store
    }

    pub fn processing_over(&self) -> bool {
        self.processing_over
    }

    pub fn root_elements(&self) -> &[String] {
        &self.root_elements
    }

    /// Elements annotated with the given annotation type.
    ///
    /// Types come first in declaration order, each followed by its annotated methods.
    pub fn elements_annotated_with(&self, annotation_type: &str) -> Vec<ElementRef<'a>> {
        let mut found = Vec::new();
        for element in self.root_elements.iter().filter_map(|name| self.store.get(name)) {
            if element.is_annotated_with(annotation_type) {
                found.push(ElementRef::Type(element));
            }
            for method in &element.methods {
                if method.annotation(annotation_type).is_some() {
                    found.push(ElementRef::Executable { method, enclosing: element });
                }
            }
        }
        found
    }

    /// Which of the supported annotation types appear on this round's elements
    pub fn annotations_present(&self, supported: &[&str]) -> IndexSet<String> {
        supported
            .iter()
            .filter(|annotation| !self.elements_annotated_with(annotation).is_empty())
            .map(|annotation| annotation.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{AnnotationMirror, ExecutableElement, TypeElement};

    const MARKER: &str = "com.example.Marker";

    #[test]
    fn test_elements_annotated_with_keeps_order() {
        let mut store = ElementStore::new();
        store.insert(TypeElement::class("com.example.B").annotated(AnnotationMirror::new(MARKER)));
        store.insert(TypeElement::class("com.example.A").annotated(AnnotationMirror::new(MARKER)));
        store.insert(
            TypeElement::class("com.example.C")
                .with_method(ExecutableElement::method("run").annotated(AnnotationMirror::new(MARKER))),
        );
        store.insert(TypeElement::class("com.example.Plain"));

        let roots = vec![
            "com.example.A".to_string(),
            "com.example.B".to_string(),
            "com.example.C".to_string(),
            "com.example.Plain".to_string(),
        ];
        let round = RoundEnvironment::new(&store, roots);

        let names: Vec<String> = round
            .elements_annotated_with(MARKER)
            .iter()
            .map(|e| e.display_name())
            .collect();
        assert_eq!(names, vec!["com.example.A", "com.example.B", "com.example.C#run"]);
    }

    #[test]
    fn test_annotations_present() {
        let mut store = ElementStore::new();
        store.insert(TypeElement::class("com.example.A").annotated(AnnotationMirror::new(MARKER)));

        let round = RoundEnvironment::new(&store, vec!["com.example.A".into()]);
        let present = round.annotations_present(&[MARKER, "com.example.Other"]);
        assert_eq!(present.len(), 1);
        assert!(present.contains(MARKER));

        let last = RoundEnvironment::final_round(&store);
        assert!(last.processing_over());
        assert!(last.annotations_present(&[MARKER]).is_empty());
    }
}
