//! Diagnostics
//!
//! Notes, warnings and errors reported back to the host pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Note,
    Warning,
    Error,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Note => "note",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Error => "error",
        }
    }
}

/// A single reported message, optionally bound to the offending element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Qualified name of the element the message is reported against
    pub element: Option<String>,
}

impl Diagnostic {
    pub fn note(message: impl Into<String>, element: Option<&str>) -> Self {
        Self::new(DiagnosticKind::Note, message, element)
    }

    pub fn warning(message: impl Into<String>, element: Option<&str>) -> Self {
        Self::new(DiagnosticKind::Warning, message, element)
    }

    pub fn error(message: impl Into<String>, element: Option<&str>) -> Self {
        Self::new(DiagnosticKind::Error, message, element)
    }

    fn new(kind: DiagnosticKind, message: impl Into<String>, element: Option<&str>) -> Self {
        Self {
            kind,
            message: message.into(),
            element: element.map(str::to_string),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(f, "{}: {} [{}]", self.kind.as_str(), self.message, element),
            None => write!(f, "{}: {}", self.kind.as_str(), self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::warning("skipped", Some("com.example.Foo"));
        assert_eq!(d.to_string(), "warning: skipped [com.example.Foo]");

        let d = Diagnostic::error("boom", None);
        assert!(d.is_error());
        assert_eq!(d.to_string(), "error: boom");
    }
}
