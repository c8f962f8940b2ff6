//! Quill AST definitions
//!
//! The tree is a closed set of node kinds. Every pass matches on them
//! exhaustively, so adding a node kind is a compile error until each pass
//! handles it.

mod expr;
mod stmt;
mod item;

pub use expr::*;
pub use stmt::*;
pub use item::*;

use crate::common::Span;

/// A complete source file: the ordered top-level declarations
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub items: Vec<Item>,
    pub span: Span,
}

impl Program {
    pub fn new(items: Vec<Item>, span: Span) -> Self {
        Self { items, span }
    }

    /// Top-level function declarations, in source order
    pub fn functions(&self) -> impl Iterator<Item = &std::rc::Rc<FunctionDecl>> {
        self.items.iter().filter_map(|item| match &item.kind {
            ItemKind::Function(func) => Some(func),
            ItemKind::Variable(_) => None,
        })
    }
}
