//! Semantic analyzer
//!
//! Walks every function body against the global table, checking that
//! names and types resolve along the scope chain. Nothing is evaluated.

use std::rc::Rc;

use crate::common::{DiagnosticKind, Diagnostics, Span};
use crate::frontend::ast::*;
use crate::symbol::{Scope, ScopeStack, Symbol};

/// Semantic analyzer over the function bodies of a program
pub struct SemanticAnalyzer {
    stack: ScopeStack,
    diagnostics: Diagnostics,
}

impl SemanticAnalyzer {
    pub fn new(globals: &Scope) -> Self {
        Self {
            stack: ScopeStack::new(globals.clone()),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Analyze every top-level function. Never stops on the first problem.
    pub fn analyze(&mut self, program: &Program) {
        for func in program.functions() {
            self.visit_function(func, false);
        }
        log::debug!(
            "analysis finished: {} error(s), {} warning(s)",
            self.diagnostics.errors().len(),
            self.diagnostics.warnings().len()
        );
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn stack(&self) -> &ScopeStack {
        &self.stack
    }

    fn visit_function(&mut self, func: &Rc<FunctionDecl>, nested: bool) {
        self.resolve_type(&func.return_type);

        if nested {
            if self.stack.lookup_local(&func.name).is_some() {
                self.report(
                    DiagnosticKind::DuplicateDeclaration,
                    format!("a symbol named `{}` has already been declared in this scope", func.name),
                    func.span,
                );
            } else {
                self.stack.insert(Symbol::function(Rc::clone(func)));
            }
        }

        log::debug!("enter function `{}`", func.name);
        self.stack.push(&func.name);

        for param in &func.params {
            self.visit_param(param);
        }
        for stmt in &func.body {
            self.visit_stmt(stmt);
        }

        self.stack.pop();
        log::debug!("leave function `{}`", func.name);
    }

    fn visit_param(&mut self, param: &VarDecl) {
        self.resolve_type(&param.ty);
        if let Some(init) = &param.init {
            self.visit_expr(init);
        }

        if self.stack.lookup_local(&param.name).is_some() {
            self.report(
                DiagnosticKind::DuplicateDeclaration,
                format!("parameter `{}` is declared more than once", param.name),
                param.span,
            );
            return;
        }

        let symbol = Symbol::binding(param.constant, &param.name, &param.ty.name, None)
            .with_span(param.span);
        self.stack.insert(symbol);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Variable(decl) => self.visit_var_decl(decl),
            StmtKind::Function(func) => self.visit_function(func, true),
            StmtKind::Assign { target, target_span, value } => {
                self.visit_expr(value);
                self.resolve_symbol(target, *target_span);
            }
            StmtKind::Expr(expr) => self.visit_expr(expr),
        }
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        self.resolve_type(&decl.ty);

        // the initializer runs against the bindings that exist before this one
        if let Some(init) = &decl.init {
            self.visit_expr(init);
        }

        if self.stack.lookup_local(&decl.name).is_some() {
            self.report(
                DiagnosticKind::DuplicateDeclaration,
                format!("a symbol named `{}` has already been declared in this scope", decl.name),
                decl.span,
            );
            return;
        }

        if self.stack.lookup_global(&decl.name).is_some() {
            self.report(
                DiagnosticKind::ShadowingGlobal,
                format!("`{}` shadows a global declaration", decl.name),
                decl.span,
            );
        }

        let symbol = Symbol::binding(decl.constant, &decl.name, &decl.ty.name, None)
            .with_span(decl.span);
        self.stack.insert(symbol);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Number(_) => {}
            ExprKind::Binary { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.visit_expr(operand),
            ExprKind::Symbol(name) => self.resolve_symbol(name, expr.span),
        }
    }

    fn resolve_symbol(&mut self, name: &str, span: Span) {
        if self.stack.lookup(name).is_none() {
            self.report(
                DiagnosticKind::UnknownSymbol,
                format!("unknown symbol reference `{name}`, it has not been declared in this scope"),
                span,
            );
        }
    }

    fn resolve_type(&mut self, ty: &TypeRef) {
        let message = match self.stack.lookup(&ty.name) {
            Some(symbol) if symbol.is_type() => return,
            Some(_) => format!("`{}` is not a type", ty.name),
            None => format!("unknown type reference `{}`", ty.name),
        };
        self.report(DiagnosticKind::UnknownType, message, ty.span);
    }

    fn report(&mut self, kind: DiagnosticKind, message: String, span: Span) {
        self.diagnostics.report(kind, message, span);
    }
}
