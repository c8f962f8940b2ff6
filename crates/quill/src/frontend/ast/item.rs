//! Quill declaration AST nodes

use super::{Expr, Stmt};
use crate::common::Span;
use std::rc::Rc;

/// A top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

impl Item {
    pub fn new(kind: ItemKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Item kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Global declaration: val a : Int = 3
    Variable(VarDecl),
    /// Function: func main() : Int { ... }
    Function(Rc<FunctionDecl>),
}

/// A reference to a type by name: the `Int` in `: Int`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub span: Span,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }
}

/// Variable or constant declaration, also used for function parameters
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declared with `lateinit`
    pub late_init: bool,
    /// `val` (assign-once) rather than `var`
    pub constant: bool,
    pub name: String,
    pub ty: TypeRef,
    pub init: Option<Expr>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(constant: bool, name: impl Into<String>, ty: TypeRef, init: Option<Expr>, span: Span) -> Self {
        Self {
            late_init: false,
            constant,
            name: name.into(),
            ty,
            init,
            span,
        }
    }
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<VarDecl>,
    pub return_type: TypeRef,
    pub body: Vec<Stmt>,
    pub span: Span,
}
