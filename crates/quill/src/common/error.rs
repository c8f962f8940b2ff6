//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::{Diagnostic, Diagnostics, Severity, Span, Stage};

/// Error that stops the pipeline
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    #[error("{stage} failed with {} error(s)", .diagnostics.errors().len())]
    Diagnostics { stage: Stage, diagnostics: Diagnostics },

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn diagnostics(stage: Stage, diagnostics: Diagnostics) -> Self {
        Self::Diagnostics { stage, diagnostics }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Fatal condition raised while evaluating a program
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("undefined `main` reference")]
    UndefinedMain,

    #[error("`main` must refer to a function")]
    NotAFunction { span: Span },

    #[error("types mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String, span: Span },

    #[error("use of a value that was never initialized")]
    UninitializedValue { span: Span },

    #[error("`{name}` is a val and cannot be reassigned")]
    ImmutableReassignment { name: String, span: Span },

    #[error("`{name}` does not hold a value and cannot be assigned")]
    NotAssignable { name: String, span: Span },

    #[error("unknown symbol reference `{name}`")]
    UnknownSymbol { name: String, span: Span },

    #[error("unknown type reference `{name}`")]
    UnknownType { name: String, span: Span },

    #[error("integer overflow")]
    Overflow { span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::UndefinedMain => None,
            RuntimeError::NotAFunction { span }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::UninitializedValue { span }
            | RuntimeError::ImmutableReassignment { span, .. }
            | RuntimeError::NotAssignable { span, .. }
            | RuntimeError::UnknownSymbol { span, .. }
            | RuntimeError::UnknownType { span, .. }
            | RuntimeError::Overflow { span } => Some(*span),
        }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let report = match error {
            CompileError::Lexer { message, span } => Report::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            CompileError::Parser { message, span } => Report::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            CompileError::Diagnostics { stage, diagnostics } => {
                self.report_diagnostics(file_id, diagnostics);
                Report::error().with_message(format!(
                    "errors have been found during {stage}, execution stopped"
                ))
            }

            CompileError::Runtime(err) => {
                let report = Report::error().with_message(format!("Runtime error: {err}"));
                match err.span() {
                    Some(span) => report.with_labels(vec![Label::primary(file_id, span.range())]),
                    None => report,
                }
            }

            CompileError::Io(err) => {
                Report::error().with_message(format!("IO error: {err}"))
            }
        };

        self.emit(&report);
    }

    /// Render every error, then every warning, of one pass
    pub fn report_diagnostics(&self, file_id: usize, diagnostics: &Diagnostics) {
        for diagnostic in diagnostics.iter() {
            self.report_diagnostic(file_id, diagnostic);
        }
    }

    pub fn report_diagnostic(&self, file_id: usize, diagnostic: &Diagnostic) {
        let report = match diagnostic.severity() {
            Severity::Error => Report::error(),
            Severity::Warning => Report::warning(),
        };
        let report = report
            .with_message(diagnostic.kind.to_string())
            .with_code(diagnostic.kind.code())
            .with_labels(vec![
                Label::primary(file_id, diagnostic.span.range()).with_message(&diagnostic.message)
            ]);
        self.emit(&report);
    }

    fn emit(&self, report: &Report<usize>) {
        if let Err(err) = term::emit(&mut self.writer.lock(), &self.config, &self.files, report) {
            log::warn!("failed to render diagnostic: {err}");
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
