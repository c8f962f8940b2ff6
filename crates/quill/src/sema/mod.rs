//! Static passes over a parsed program
//!
//! - [`GlobalTableBuilder`] folds the top-level declarations into the
//!   global symbol table
//! - [`SemanticAnalyzer`] checks every function body against that table

mod analyzer;
mod globals;

pub use analyzer::SemanticAnalyzer;
pub use globals::{GlobalTable, GlobalTableBuilder};
