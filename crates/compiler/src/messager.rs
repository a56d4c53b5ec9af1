//! Messager
//!
//! Diagnostic sink of a processing run. Every message is logged, recorded and
//! published on the event bus when one is attached.

use std::sync::Arc;

use october_core::{Diagnostic, DiagnosticKind, Event, EventBus};
use tracing::{error, info, warn};

/// Collects notes, warnings and errors reported while processing
#[derive(Default)]
pub struct Messager {
    diagnostics: Vec<Diagnostic>,
    events: Option<Arc<EventBus>>,
}

impl Messager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish every diagnostic on an event bus as well
    pub fn with_events(events: Arc<EventBus>) -> Self {
        Self {
            diagnostics: Vec::new(),
            events: Some(events),
        }
    }

    pub fn note(&mut self, message: impl Into<String>, element: Option<&str>) {
        self.print(Diagnostic::note(message, element));
    }

    pub fn warning(&mut self, message: impl Into<String>, element: Option<&str>) {
        self.print(Diagnostic::warning(message, element));
    }

    pub fn error(&mut self, message: impl Into<String>, element: Option<&str>) {
        self.print(Diagnostic::error(message, element));
    }

    /// Report each message as a separate error against the same element
    pub fn errors<I, S>(&mut self, element: Option<&str>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.error(message, element);
        }
    }

    fn print(&mut self, diagnostic: Diagnostic) {
        let element = diagnostic.element.as_deref().unwrap_or("-");
        match diagnostic.kind {
            DiagnosticKind::Note => info!(element, "{}", diagnostic.message),
            DiagnosticKind::Warning => warn!(element, "{}", diagnostic.message),
            DiagnosticKind::Error => error!(element, "{}", diagnostic.message),
        }
        if let Some(events) = &self.events {
            events.emit(Event::Diagnostic(diagnostic.clone()));
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Diagnostics of one severity
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Hand over every recorded diagnostic, leaving the messager empty
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_publishes() {
        let bus = Arc::new(EventBus::new());
        let subscription = bus.subscribe();
        let mut messager = Messager::with_events(bus);

        messager.note("Processing class App", None);
        messager.errors(Some("com.example.App"), vec!["first", "second"]);

        assert_eq!(messager.diagnostics().len(), 3);
        assert_eq!(messager.error_count(), 2);
        assert_eq!(messager.of_kind(DiagnosticKind::Note).count(), 1);
        assert_eq!(subscription.drain().len(), 3);

        let taken = messager.take();
        assert_eq!(taken.len(), 3);
        assert!(!messager.has_errors());
    }
}
