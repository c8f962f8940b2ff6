//! Quill - a small statically typed expression language
//!
//! This library parses Quill source, builds its global symbol table,
//! checks every function body and evaluates `main`.
//!
//! ## Architecture
//!
//! The interpreter is organized into:
//! - **Frontend** (`frontend/`): Lexing and parsing into an AST
//! - **Symbols** (`symbol/`): Symbols, scopes and the scope stack
//! - **Semantic passes** (`sema/`): Global table construction and analysis
//! - **Interpreter** (`interp/`): Tree-walking evaluation of `main`
//! - **Driver** (`driver/`): The staged pipeline tying them together
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics, spans)
//! - **Types** (`types/`): Runtime values and constant folding

pub mod common;
pub mod types;
pub mod frontend;
pub mod symbol;
pub mod sema;
pub mod interp;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticKind, DiagnosticReporter, Diagnostics, RuntimeError, Span};
pub use driver::{CompileContext, Pipeline, PipelineConfig, RunReport};
pub use interp::{BodyPolicy, Evaluator};
pub use sema::{GlobalTableBuilder, SemanticAnalyzer};
pub use symbol::{Scope, ScopeStack, Symbol, SymbolKind};
pub use types::Value;
