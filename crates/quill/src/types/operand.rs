//! Folding of arithmetic over typed, possibly uninitialized operands

use super::Value;
use crate::common::{DiagnosticKind, RuntimeError, Span};
use crate::frontend::ast::{BinOp, UnaryOp};
use thiserror::Error;

/// An anonymous intermediate result: the type it carries and its value,
/// if it has one
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub ty: Option<String>,
    pub value: Option<Value>,
}

impl Operand {
    pub fn new(ty: Option<String>, value: Option<Value>) -> Self {
        Self { ty, value }
    }

    /// Operand for a numeric literal, typed by its numeric kind
    pub fn literal(value: Value) -> Self {
        Self {
            ty: Some(value.kind().type_name().to_string()),
            value: Some(value),
        }
    }

    pub fn type_label(&self) -> &str {
        self.ty.as_deref().unwrap_or("<untyped>")
    }
}

/// Why an operation could not be folded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FoldError {
    #[error("types mismatch: {left} {op} {right}")]
    TypeMismatch { left: String, op: String, right: String },

    #[error("try to compute a value that is not initialized")]
    Uninitialized,

    #[error("integer overflow while computing `{op}`")]
    Overflow { op: String },
}

impl FoldError {
    /// Kind of the diagnostic a compile-time fold reports
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            FoldError::TypeMismatch { .. } => DiagnosticKind::TypeMismatch,
            FoldError::Uninitialized => DiagnosticKind::UninitializedValue,
            FoldError::Overflow { .. } => DiagnosticKind::Overflow,
        }
    }

    /// The fatal error the evaluator raises for this failure
    pub fn into_runtime(self, span: Span) -> RuntimeError {
        match self {
            FoldError::TypeMismatch { left, right, .. } => RuntimeError::TypeMismatch {
                expected: left,
                found: right,
                span,
            },
            FoldError::Uninitialized => RuntimeError::UninitializedValue { span },
            FoldError::Overflow { .. } => RuntimeError::Overflow { span },
        }
    }
}

/// Fold `left op right`. Both operands must carry the same type and a
/// value; the result keeps the operands' type.
pub fn fold_binary(op: BinOp, left: &Operand, right: &Operand) -> Result<Operand, FoldError> {
    if left.ty != right.ty {
        return Err(FoldError::TypeMismatch {
            left: left.type_label().to_string(),
            op: op.to_string(),
            right: right.type_label().to_string(),
        });
    }

    let (Some(l), Some(r)) = (left.value, right.value) else {
        return Err(FoldError::Uninitialized);
    };

    let value = match op {
        BinOp::Add => l.checked_add(r),
        BinOp::Sub => l.checked_sub(r),
        BinOp::Mul => l.checked_mul(r),
        BinOp::Div => l.checked_div(r),
    }
    .ok_or_else(|| FoldError::Overflow { op: op.to_string() })?;

    Ok(Operand::new(left.ty.clone(), Some(value)))
}

/// Fold `op operand`
pub fn fold_unary(op: UnaryOp, operand: &Operand) -> Result<Operand, FoldError> {
    let Some(value) = operand.value else {
        return Err(FoldError::Uninitialized);
    };

    let value = match op {
        UnaryOp::Plus => value,
        UnaryOp::Neg => value
            .checked_neg()
            .ok_or_else(|| FoldError::Overflow { op: op.to_string() })?,
    };

    Ok(Operand::new(operand.ty.clone(), Some(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Operand {
        Operand::literal(Value::Int(v))
    }

    #[test]
    fn test_fold_keeps_left_type() {
        let folded = fold_binary(BinOp::Div, &int(5), &int(2)).unwrap();
        assert_eq!(folded.ty.as_deref(), Some("Int"));
        assert_eq!(folded.value, Some(Value::Float(2.5)));
    }

    #[test]
    fn test_fold_type_mismatch() {
        let float = Operand::literal(Value::Float(1.0));
        let err = fold_binary(BinOp::Add, &int(1), &float).unwrap_err();
        assert!(matches!(err, FoldError::TypeMismatch { .. }));
    }

    #[test]
    fn test_fold_uninitialized() {
        let empty = Operand::new(Some("Int".to_string()), None);
        assert_eq!(fold_binary(BinOp::Mul, &int(1), &empty), Err(FoldError::Uninitialized));
        assert_eq!(fold_unary(UnaryOp::Neg, &empty), Err(FoldError::Uninitialized));
    }

    #[test]
    fn test_fold_unary() {
        assert_eq!(fold_unary(UnaryOp::Neg, &int(3)).unwrap().value, Some(Value::Int(-3)));
        assert_eq!(fold_unary(UnaryOp::Plus, &int(3)).unwrap().value, Some(Value::Int(3)));
    }
}
