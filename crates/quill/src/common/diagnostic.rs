//! Accumulated, non-fatal diagnostics produced by the validation passes

use super::Span;
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Halts the pipeline before the next stage
    Error,
    /// Reported, never halts anything
    Warning,
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnknownSymbol,
    UnknownType,
    DuplicateDeclaration,
    ShadowingGlobal,
    TypeMismatch,
    UninitializedValue,
    Overflow,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::ShadowingGlobal => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Short stable code shown next to rendered diagnostics
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownSymbol => "E0001",
            DiagnosticKind::UnknownType => "E0002",
            DiagnosticKind::DuplicateDeclaration => "E0003",
            DiagnosticKind::TypeMismatch => "E0004",
            DiagnosticKind::UninitializedValue => "E0005",
            DiagnosticKind::Overflow => "E0006",
            DiagnosticKind::ShadowingGlobal => "W0001",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::UnknownSymbol => "unknown symbol",
            DiagnosticKind::UnknownType => "unknown type",
            DiagnosticKind::DuplicateDeclaration => "duplicate declaration",
            DiagnosticKind::ShadowingGlobal => "shadowing a global",
            DiagnosticKind::TypeMismatch => "type mismatch",
            DiagnosticKind::UninitializedValue => "uninitialized value",
            DiagnosticKind::Overflow => "arithmetic overflow",
        };
        f.write_str(text)
    }
}

/// A single error or warning with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.span, self.message)
    }
}

/// The error and warning lists of one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic in the list matching its severity
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.push(Diagnostic::new(kind, message, span));
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Errors first, then warnings
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Number of diagnostics of the given kind, in either list
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.iter().filter(|d| d.kind == kind).count()
    }
}

/// Pipeline stage that produces diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Globals,
    Analysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Globals => f.write_str("global table construction"),
            Stage::Analysis => f.write_str("semantic analysis"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_severity() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(DiagnosticKind::UnknownSymbol, "unknown symbol `x`", Span::new(0, 1));
        diagnostics.report(DiagnosticKind::ShadowingGlobal, "`a` shadows a global", Span::new(2, 3));

        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.count(DiagnosticKind::ShadowingGlobal), 1);
    }

    #[test]
    fn test_warnings_alone_are_not_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(DiagnosticKind::ShadowingGlobal, "`a` shadows a global", Span::default());

        assert!(!diagnostics.has_errors());
        assert!(!diagnostics.is_empty());
    }
}
