//! Tree-walking evaluator
//!
//! Runs `main` against a copy of the global table. Every computed value is
//! written into the current frame's register; whatever the register holds
//! when a body finishes is the function's result.

use std::rc::Rc;

use clap::ValueEnum;

use crate::common::{RuntimeError, RuntimeResult, Span};
use crate::frontend::ast::*;
use crate::symbol::{Scope, ScopeStack, Symbol, SymbolError, SymbolKind};
use crate::types::{fold_binary, fold_unary, Operand, Value};

/// Name of the entry point function
pub const ENTRY_POINT: &str = "main";

/// What a function body does after a statement that yields no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BodyPolicy {
    /// End the body at the first such statement
    #[default]
    StopOnAbsent,
    /// Always run every statement
    RunToEnd,
}

/// Outcome of one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Value,
    Absent,
}

/// Evaluator for a program's `main` function
pub struct Evaluator {
    stack: ScopeStack,
    policy: BodyPolicy,
}

impl Evaluator {
    pub fn new(globals: Scope) -> Self {
        Self {
            stack: ScopeStack::new(globals),
            policy: BodyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BodyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn stack(&self) -> &ScopeStack {
        &self.stack
    }

    /// Global table after evaluation, with any writes to global variables
    pub fn into_globals(self) -> Scope {
        self.stack.into_global()
    }

    /// Call `main` and return the value it left in its register
    pub fn run(&mut self) -> RuntimeResult<Option<Value>> {
        let main = match self.stack.lookup(ENTRY_POINT) {
            Some(symbol) => symbol
                .as_function()
                .cloned()
                .ok_or(RuntimeError::NotAFunction { span: symbol.span })?,
            None => return Err(RuntimeError::UndefinedMain),
        };

        let result = self.call(&main)?;
        log::debug!("`{ENTRY_POINT}` returned {result:?}");
        Ok(result)
    }

    /// Call a function. Its scope is popped on every exit path.
    pub fn call(&mut self, func: &Rc<FunctionDecl>) -> RuntimeResult<Option<Value>> {
        log::debug!("call `{}`", func.name);
        self.stack.push(&func.name);

        let outcome = self.eval_body(func);
        let result = self.stack.result();

        self.stack.pop();
        outcome.map(|()| result)
    }

    fn eval_body(&mut self, func: &FunctionDecl) -> RuntimeResult<()> {
        for param in &func.params {
            self.eval_var_decl(param)?;
        }
        // parameter defaults are not the body's result
        self.stack.set_result(None);

        for stmt in &func.body {
            let completion = self.eval_stmt(stmt)?;
            if completion == Completion::Absent && self.policy == BodyPolicy::StopOnAbsent {
                log::trace!("statement at {} yields no value, ending `{}`", stmt.span, func.name);
                break;
            }
        }
        Ok(())
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> RuntimeResult<Completion> {
        match &stmt.kind {
            StmtKind::Variable(decl) => self.eval_var_decl(decl)?,
            StmtKind::Function(func) => {
                self.stack.insert(Symbol::function(Rc::clone(func)));
                return Ok(Completion::Absent);
            }
            StmtKind::Assign { target, target_span, value } => {
                self.eval_assign(target, *target_span, value, stmt.span)?;
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
            }
        }
        Ok(Completion::Value)
    }

    fn eval_var_decl(&mut self, decl: &VarDecl) -> RuntimeResult<()> {
        self.resolve_type(&decl.ty)?;

        let value = match &decl.init {
            Some(init) => self.eval_expr(init)?.value,
            None => None,
        };

        let symbol = Symbol::binding(decl.constant, &decl.name, &decl.ty.name, value)
            .with_span(decl.span);
        self.stack.insert(symbol);
        self.stack.set_result(value);
        Ok(())
    }

    fn eval_assign(&mut self, target: &str, target_span: Span, value: &Expr, span: Span) -> RuntimeResult<()> {
        let operand = self.eval_expr(value)?;
        let Some(new_value) = operand.value else {
            return Err(RuntimeError::UninitializedValue { span: value.span });
        };

        let symbol = self.stack.lookup_mut(target).ok_or_else(|| RuntimeError::UnknownSymbol {
            name: target.to_string(),
            span: target_span,
        })?;

        let declared = match &symbol.kind {
            SymbolKind::Variable { ty, .. } | SymbolKind::Constant { ty, .. } => ty.as_str(),
            SymbolKind::Function(_) | SymbolKind::Type => {
                return Err(RuntimeError::NotAssignable {
                    name: target.to_string(),
                    span,
                });
            }
        };
        if operand.ty.as_deref() != Some(declared) {
            return Err(RuntimeError::TypeMismatch {
                expected: declared.to_string(),
                found: operand.type_label().to_string(),
                span: value.span,
            });
        }

        symbol.set_value(Some(new_value)).map_err(|err| match err {
            SymbolError::ImmutableReassignment(name) => RuntimeError::ImmutableReassignment { name, span },
            SymbolError::NotAssignable(name) => RuntimeError::NotAssignable { name, span },
        })?;

        self.stack.set_result(Some(new_value));
        Ok(())
    }

    fn eval_expr(&mut self, expr: &Expr) -> RuntimeResult<Operand> {
        let operand = match &expr.kind {
            ExprKind::Number(value) => Operand::literal(*value),

            ExprKind::Symbol(name) => {
                let symbol = self.stack.lookup(name).ok_or_else(|| RuntimeError::UnknownSymbol {
                    name: name.clone(),
                    span: expr.span,
                })?;
                Operand::new(symbol.ty().map(str::to_string), symbol.value())
            }

            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                fold_binary(*op, &left, &right).map_err(|err| err.into_runtime(expr.span))?
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.eval_expr(operand)?;
                fold_unary(*op, &operand).map_err(|err| err.into_runtime(expr.span))?
            }
        };

        self.stack.set_result(operand.value);
        Ok(operand)
    }

    fn resolve_type(&self, ty: &TypeRef) -> RuntimeResult<()> {
        match self.stack.lookup(&ty.name) {
            Some(symbol) if symbol.is_type() => Ok(()),
            _ => Err(RuntimeError::UnknownType {
                name: ty.name.clone(),
                span: ty.span,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse;
    use crate::sema::GlobalTableBuilder;
    use pretty_assertions::assert_eq;

    fn evaluator(source: &str, policy: BodyPolicy) -> Evaluator {
        let program = parse(source).unwrap();
        let globals = GlobalTableBuilder::new().build(&program);
        assert!(!globals.diagnostics.has_errors(), "{:?}", globals.diagnostics);
        Evaluator::new(globals.scope).with_policy(policy)
    }

    fn run(source: &str) -> RuntimeResult<Option<Value>> {
        evaluator(source, BodyPolicy::default()).run()
    }

    #[test]
    fn test_implicit_return_value() {
        let result = run("func main() : Int {\n var acc : Int = 3\n acc = acc * 3\n acc + 1\n}");
        assert_eq!(result, Ok(Some(Value::Int(10))));
    }

    #[test]
    fn test_arrow_body() {
        assert_eq!(run("func main() : Int -> 3 * 3 + 10 / 2"), Ok(Some(Value::Float(14.0))));
    }

    #[test]
    fn test_empty_body_returns_nothing() {
        assert_eq!(run("func main() : Int {}"), Ok(None));
    }

    #[test]
    fn test_reads_globals() {
        let result = run("val limit : Int = (2 + 3) / 2\nfunc main() : Int -> limit * 2");
        assert_eq!(result, Ok(Some(Value::Float(5.0))));
    }

    #[test]
    fn test_undefined_main() {
        assert_eq!(run("val a : Int = 1"), Err(RuntimeError::UndefinedMain));
    }

    #[test]
    fn test_main_must_be_a_function() {
        let result = run("val main : Int = 1");
        assert!(matches!(result, Err(RuntimeError::NotAFunction { .. })));
    }

    #[test]
    fn test_constant_reassignment_keeps_value() {
        let mut evaluator = evaluator(
            "val c : Int = 5\nfunc main() : Int {\n c = 6\n}",
            BodyPolicy::default(),
        );
        let result = evaluator.run();

        assert!(matches!(result, Err(RuntimeError::ImmutableReassignment { ref name, .. }) if name == "c"));
        assert_eq!(evaluator.stack().depth(), 1);
        assert_eq!(evaluator.into_globals().get("c").unwrap().value(), Some(Value::Int(5)));
    }

    #[test]
    fn test_lateinit_constant_assigns_once() {
        let result = run("func main() : Int {\n lateinit val c : Int\n c = 1\n c = 2\n}");
        assert!(matches!(result, Err(RuntimeError::ImmutableReassignment { .. })));

        let result = run("func main() : Int {\n lateinit val c : Int\n c = 1\n c\n}");
        assert_eq!(result, Ok(Some(Value::Int(1))));
    }

    #[test]
    fn test_global_variable_mutation() {
        let mut evaluator = evaluator(
            "var counter : Int = 1\nfunc main() : Int {\n counter = counter + 41\n}",
            BodyPolicy::default(),
        );
        assert_eq!(evaluator.run(), Ok(Some(Value::Int(42))));
        assert_eq!(evaluator.into_globals().get("counter").unwrap().value(), Some(Value::Int(42)));
    }

    #[test]
    fn test_repeated_folding_is_deterministic() {
        let mut evaluator = evaluator(
            "var x : Int = 3\n\
             func main() : Int {\n\
                 x * 3 + 10 / 2\n\
                 x * 3 + 10 / 2\n\
             }",
            BodyPolicy::default(),
        );

        assert_eq!(evaluator.run(), Ok(Some(Value::Float(14.0))));
        assert_eq!(evaluator.run(), Ok(Some(Value::Float(14.0))));
        assert_eq!(evaluator.stack().depth(), 1);
        assert_eq!(evaluator.into_globals().get("x").unwrap().value(), Some(Value::Int(3)));
    }

    #[test]
    fn test_assignment_type_mismatch() {
        let result = run("func main() : Int {\n var a : Int = 1\n a = 2.5\n}");
        assert!(matches!(
            result,
            Err(RuntimeError::TypeMismatch { ref expected, ref found, .. }) if expected == "Int" && found == "Float"
        ));
    }

    #[test]
    fn test_assign_uninitialized_value() {
        let result = run("func main() : Int {\n lateinit var a : Int\n var b : Int = 1\n b = a\n}");
        assert!(matches!(result, Err(RuntimeError::UninitializedValue { .. })));
    }

    #[test]
    fn test_assign_to_function() {
        let result = run("func f() : Int -> 1\nfunc main() : Int {\n f = 2\n}");
        assert!(matches!(result, Err(RuntimeError::NotAssignable { ref name, .. }) if name == "f"));
    }

    #[test]
    fn test_unknown_symbol_is_fatal() {
        let mut evaluator = evaluator("func main() : Int -> missing", BodyPolicy::default());
        let result = evaluator.run();

        assert!(matches!(result, Err(RuntimeError::UnknownSymbol { ref name, .. }) if name == "missing"));
        assert_eq!(evaluator.stack().depth(), 1);
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let result = run("func main() : Int {\n var a : Text = 1\n}");
        assert!(matches!(result, Err(RuntimeError::UnknownType { .. })));
    }

    #[test]
    fn test_overflow_is_fatal() {
        let result = run("func main() : Int -> 9223372036854775807 * 2");
        assert!(matches!(result, Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn test_bare_symbol_writes_its_value() {
        let result = run("func main() : Int {\n lateinit var a : Int\n 1 + 1\n a\n}");
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_nested_function_stops_body_by_default() {
        let source = "func main() : Int {\n\
                          var a : Int = 1\n\
                          func inner() : Int -> 2\n\
                          a + 10\n\
                      }";

        let stopped = evaluator(source, BodyPolicy::StopOnAbsent).run();
        assert_eq!(stopped, Ok(Some(Value::Int(1))));

        let completed = evaluator(source, BodyPolicy::RunToEnd).run();
        assert_eq!(completed, Ok(Some(Value::Int(11))));
    }

    #[test]
    fn test_parameter_defaults_are_bound() {
        let program = parse("func double(val x : Int = 4) : Int -> x * 2").unwrap();
        let globals = GlobalTableBuilder::new().build(&program);
        let double = globals.scope.get("double").unwrap().as_function().cloned().unwrap();

        let mut evaluator = Evaluator::new(globals.scope);
        assert_eq!(evaluator.call(&double), Ok(Some(Value::Int(8))));
        assert_eq!(evaluator.stack().depth(), 1);
    }

    #[test]
    fn test_locals_do_not_leak_into_globals() {
        let mut evaluator = evaluator(
            "func main() : Int {\n var local : Int = 1\n}",
            BodyPolicy::default(),
        );
        evaluator.run().unwrap();
        assert!(evaluator.into_globals().get("local").is_none());
    }
}
