//! Quill statement AST nodes

use super::{Expr, FunctionDecl, VarDecl};
use crate::common::Span;
use std::rc::Rc;

/// A statement inside a function body
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Local declaration: var x : Int = 5
    Variable(VarDecl),

    /// Nested function declaration
    Function(Rc<FunctionDecl>),

    /// Assignment: x = 5
    Assign {
        target: String,
        target_span: Span,
        value: Expr,
    },

    /// Bare expression; its value becomes the frame result
    Expr(Expr),
}
