//! Global table construction
//!
//! One pass over the top-level declarations. Initializers are folded to
//! constants, functions are registered without looking at their bodies.

use std::rc::Rc;

use crate::common::{DiagnosticKind, Diagnostics, Span};
use crate::frontend::ast::*;
use crate::symbol::{Scope, Symbol};
use crate::types::{fold_binary, fold_unary, FoldError, Operand};

/// Result of building the global table
#[derive(Debug, Clone)]
pub struct GlobalTable {
    pub scope: Scope,
    pub diagnostics: Diagnostics,
}

/// Builds the global symbol table from a program's top-level items
pub struct GlobalTableBuilder {
    table: Scope,
    diagnostics: Diagnostics,
}

impl GlobalTableBuilder {
    pub fn new() -> Self {
        Self {
            table: Scope::global(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn build(mut self, program: &Program) -> GlobalTable {
        log::debug!("building global table from {} item(s)", program.items.len());

        for item in &program.items {
            match &item.kind {
                ItemKind::Variable(decl) => self.visit_var_decl(decl),
                ItemKind::Function(func) => self.visit_function(func),
            }
        }

        log::debug!(
            "global table built: {} symbol(s), {} error(s)",
            self.table.len(),
            self.diagnostics.errors().len()
        );

        GlobalTable {
            scope: self.table,
            diagnostics: self.diagnostics,
        }
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        let value = decl
            .init
            .as_ref()
            .and_then(|init| self.fold(init))
            .and_then(|operand| operand.value);

        self.resolve_type(&decl.ty);
        self.check_redeclaration(&decl.name, decl.span);

        let symbol = Symbol::binding(decl.constant, &decl.name, &decl.ty.name, value)
            .with_span(decl.span);
        self.table.insert(symbol);
    }

    fn visit_function(&mut self, func: &Rc<FunctionDecl>) {
        self.check_redeclaration(&func.name, func.span);
        self.table.insert(Symbol::function(Rc::clone(func)));
    }

    fn check_redeclaration(&mut self, name: &str, span: Span) {
        if self.table.contains(name) {
            self.diagnostics.report(
                DiagnosticKind::DuplicateDeclaration,
                format!("`{name}` has already been declared in the global scope"),
                span,
            );
        }
    }

    fn resolve_type(&mut self, ty: &TypeRef) {
        match self.table.get(&ty.name) {
            Some(symbol) if symbol.is_type() => {}
            Some(_) => self.diagnostics.report(
                DiagnosticKind::UnknownType,
                format!("`{}` is not a type", ty.name),
                ty.span,
            ),
            None => self.diagnostics.report(
                DiagnosticKind::UnknownType,
                format!("unknown type reference `{}`", ty.name),
                ty.span,
            ),
        }
    }

    /// Fold an initializer to a constant operand.
    ///
    /// Returns `None` once a diagnostic has been reported for the expression.
    fn fold(&mut self, expr: &Expr) -> Option<Operand> {
        match &expr.kind {
            ExprKind::Number(value) => Some(Operand::literal(*value)),

            ExprKind::Symbol(name) => match self.table.get(name) {
                Some(symbol) => Some(Operand::new(symbol.ty().map(str::to_string), symbol.value())),
                None => {
                    self.diagnostics.report(
                        DiagnosticKind::UnknownSymbol,
                        format!("unknown symbol reference `{name}`, it has not been declared before this point"),
                        expr.span,
                    );
                    None
                }
            },

            ExprKind::Binary { op, left, right } => {
                // both sides are folded so every diagnostic surfaces
                let left = self.fold(left);
                let right = self.fold(right);
                let (left, right) = (left?, right?);
                self.check_fold(fold_binary(*op, &left, &right), expr.span)
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.fold(operand)?;
                self.check_fold(fold_unary(*op, &operand), expr.span)
            }
        }
    }

    fn check_fold(&mut self, result: Result<Operand, FoldError>, span: Span) -> Option<Operand> {
        match result {
            Ok(operand) => Some(operand),
            Err(err) => {
                self.diagnostics.report(err.diagnostic_kind(), err.to_string(), span);
                None
            }
        }
    }
}

impl Default for GlobalTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
