//! Symbol model: declared entities, the scopes storing them and the
//! stack of active scopes shared by the analyzer and the evaluator.

mod scope;
mod stack;
mod symbol;

pub use scope::Scope;
pub use stack::{Frame, ScopeId, ScopeStack};
pub use symbol::{Symbol, SymbolError, SymbolKind};
