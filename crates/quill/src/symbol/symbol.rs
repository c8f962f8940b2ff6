//! Declared entities

use crate::common::Span;
use crate::frontend::ast::FunctionDecl;
use crate::types::{Value, FLOAT_TYPE, INT_TYPE};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// A named declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Where the symbol was declared; default for built-ins
    pub span: Span,
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// Reassignable `var`
    Variable { ty: String, value: Option<Value> },
    /// Assign-once `val`: the first present value locks it
    Constant { ty: String, value: Option<Value> },
    /// Function; keeps its declaration for later evaluation
    Function(Rc<FunctionDecl>),
    /// Type name (`Int` and `Float` are built in)
    Type,
}

/// Failed write to a symbol
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("`{0}` is a val and cannot be reassigned")]
    ImmutableReassignment(String),

    #[error("`{0}` does not hold a value")]
    NotAssignable(String),
}

impl Symbol {
    pub fn variable(name: impl Into<String>, ty: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable { ty: ty.into(), value },
            span: Span::default(),
        }
    }

    pub fn constant(name: impl Into<String>, ty: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Constant { ty: ty.into(), value },
            span: Span::default(),
        }
    }

    /// Variable or constant, by declared mutability
    pub fn binding(constant: bool, name: impl Into<String>, ty: impl Into<String>, value: Option<Value>) -> Self {
        if constant {
            Self::constant(name, ty, value)
        } else {
            Self::variable(name, ty, value)
        }
    }

    pub fn function(decl: Rc<FunctionDecl>) -> Self {
        Self {
            name: decl.name.clone(),
            span: decl.span,
            kind: SymbolKind::Function(decl),
        }
    }

    pub fn builtin_type(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Type,
            span: Span::default(),
        }
    }

    /// The built-in types every global table starts with
    pub fn builtins() -> [Symbol; 2] {
        [Self::builtin_type(INT_TYPE), Self::builtin_type(FLOAT_TYPE)]
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Declared type: the value type of a binding, the return type of a
    /// function, none for a type name
    pub fn ty(&self) -> Option<&str> {
        match &self.kind {
            SymbolKind::Variable { ty, .. } | SymbolKind::Constant { ty, .. } => Some(ty.as_str()),
            SymbolKind::Function(decl) => Some(decl.return_type.name.as_str()),
            SymbolKind::Type => None,
        }
    }

    pub fn value(&self) -> Option<Value> {
        match &self.kind {
            SymbolKind::Variable { value, .. } | SymbolKind::Constant { value, .. } => *value,
            SymbolKind::Function(_) | SymbolKind::Type => None,
        }
    }

    /// Write a new value. A constant accepts a write only while it holds
    /// no value; functions and types never do.
    pub fn set_value(&mut self, new_value: Option<Value>) -> Result<(), SymbolError> {
        match &mut self.kind {
            SymbolKind::Variable { value, .. } => {
                *value = new_value;
                Ok(())
            }
            SymbolKind::Constant { value, .. } => {
                if value.is_some() {
                    return Err(SymbolError::ImmutableReassignment(self.name.clone()));
                }
                *value = new_value;
                Ok(())
            }
            SymbolKind::Function(_) | SymbolKind::Type => {
                Err(SymbolError::NotAssignable(self.name.clone()))
            }
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Type)
    }

    pub fn as_function(&self) -> Option<&Rc<FunctionDecl>> {
        match &self.kind {
            SymbolKind::Function(decl) => Some(decl),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = |value: &Option<Value>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
        match &self.kind {
            SymbolKind::Variable { ty, value: v } => write!(f, "<var {} : {} = {}>", self.name, ty, value(v)),
            SymbolKind::Constant { ty, value: v } => write!(f, "<val {} : {} = {}>", self.name, ty, value(v)),
            SymbolKind::Function(decl) => write!(
                f,
                "<func {}({} params) : {}>",
                self.name,
                decl.params.len(),
                decl.return_type.name
            ),
            SymbolKind::Type => write!(f, "<type {}>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_is_reassignable() {
        let mut symbol = Symbol::variable("a", "Int", Some(Value::Int(1)));
        symbol.set_value(Some(Value::Int(2))).unwrap();
        symbol.set_value(None).unwrap();
        assert_eq!(symbol.value(), None);
    }

    #[test]
    fn test_constant_locks_on_first_present_write() {
        let mut symbol = Symbol::constant("c", "Int", None);
        // absent writes do not lock
        symbol.set_value(None).unwrap();
        symbol.set_value(Some(Value::Int(5))).unwrap();

        assert_eq!(
            symbol.set_value(Some(Value::Int(6))),
            Err(SymbolError::ImmutableReassignment("c".to_string()))
        );
        assert_eq!(
            symbol.set_value(None),
            Err(SymbolError::ImmutableReassignment("c".to_string()))
        );
        assert_eq!(symbol.value(), Some(Value::Int(5)));
    }

    #[test]
    fn test_types_are_not_assignable() {
        let mut symbol = Symbol::builtin_type("Int");
        assert!(matches!(symbol.set_value(Some(Value::Int(1))), Err(SymbolError::NotAssignable(_))));
        assert_eq!(symbol.ty(), None);
    }

    #[test]
    fn test_display() {
        let symbol = Symbol::constant("a", "Int", Some(Value::Float(2.5)));
        assert_eq!(symbol.to_string(), "<val a : Int = 2.5>");
        assert_eq!(Symbol::variable("b", "Float", None).to_string(), "<var b : Float = ->");
    }
}
