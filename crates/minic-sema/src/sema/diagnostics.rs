//! Diagnostic collection

use std::fmt;

use crate::common::{ErrorKind, Span, SymbolError};

/// One semantic error, anchored at the offending source range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    /// Earlier mention the error collides with, if any
    pub previous: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: Span) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn from_symbol_error(error: &SymbolError, span: Span) -> Self {
        Self {
            kind: error.kind(),
            span,
            message: error.to_string(),
            previous: error.previous(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}: {}: {}",
            self.span.start, self.span.end, self.kind, self.message
        )
    }
}

/// Ordered, exhaustive collection of diagnostics for one analysis pass
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("diagnostic: {}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, kind: ErrorKind, span: Span, message: impl Into<String>) {
        self.push(Diagnostic::new(kind, span, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// Outcome of analyzing one translation unit
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    /// The unit is accepted iff no diagnostic was produced
    pub fn is_accepted(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.diagnostics.iter().map(|d| d.kind).collect()
    }
}

impl From<Diagnostics> for AnalysisResult {
    fn from(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics: diagnostics.into_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::SymbolKind;

    #[test]
    fn test_collection_preserves_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());

        diagnostics.error(ErrorKind::MissingReturn, Span::new(30, 40), "second");
        diagnostics.error(ErrorKind::KindConflict, Span::new(0, 5), "first");

        assert!(diagnostics.has_errors());
        let kinds: Vec<ErrorKind> = diagnostics.all().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::MissingReturn, ErrorKind::KindConflict]);
    }

    #[test]
    fn test_symbol_error_conversion_keeps_previous_span() {
        let error = SymbolError::KindConflict {
            name: "a".to_string(),
            existing: SymbolKind::Variable,
            requested: SymbolKind::Function,
            previous: Some(Span::new(0, 6)),
        };
        let diagnostic = Diagnostic::from_symbol_error(&error, Span::new(7, 24));

        assert_eq!(diagnostic.kind, ErrorKind::KindConflict);
        assert_eq!(diagnostic.previous, Some(Span::new(0, 6)));
        assert_eq!(
            diagnostic.message,
            "'a' is already declared as a variable and cannot be redeclared as a function"
        );
    }

    #[test]
    fn test_result_acceptance() {
        assert!(AnalysisResult::default().is_accepted());

        let mut diagnostics = Diagnostics::new();
        diagnostics.error(ErrorKind::FunctionUsedAsValue, Span::new(1, 2), "x");
        let result = AnalysisResult::from(diagnostics);
        assert!(!result.is_accepted());
        assert_eq!(result.count(ErrorKind::FunctionUsedAsValue), 1);
        assert_eq!(result.count(ErrorKind::MissingReturn), 0);
    }
}
