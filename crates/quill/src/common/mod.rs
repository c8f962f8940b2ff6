//! Common infrastructure shared by every pass

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity, Stage};
pub use error::{CompileError, CompileResult, DiagnosticReporter, RuntimeError, RuntimeResult};
pub use span::Span;
