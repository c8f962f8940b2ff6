//! Scalar numeric values

use std::fmt;

/// Name of the built-in integer type
pub const INT_TYPE: &str = "Int";
/// Name of the built-in floating point type
pub const FLOAT_TYPE: &str = "Float";

/// Numeric kind of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Int,
    Float,
}

impl NumericKind {
    /// The built-in type a literal of this kind has
    pub fn type_name(self) -> &'static str {
        match self {
            NumericKind::Int => INT_TYPE,
            NumericKind::Float => FLOAT_TYPE,
        }
    }
}

/// A runtime value. The language has no heap objects, only numbers.
///
/// Mixed `Int`/`Float` arithmetic promotes to `Float`, and division is
/// always real division. Integer operations that leave the `i64` range
/// return `None` instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn kind(self) -> NumericKind {
        match self {
            Value::Int(_) => NumericKind::Int,
            Value::Float(_) => NumericKind::Float,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    pub fn checked_add(self, rhs: Value) -> Option<Value> {
        self.combine(rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn checked_sub(self, rhs: Value) -> Option<Value> {
        self.combine(rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn checked_mul(self, rhs: Value) -> Option<Value> {
        self.combine(rhs, i64::checked_mul, |a, b| a * b)
    }

    pub fn checked_div(self, rhs: Value) -> Option<Value> {
        Some(Value::Float(self.as_f64() / rhs.as_f64()))
    }

    pub fn checked_neg(self) -> Option<Value> {
        match self {
            Value::Int(v) => v.checked_neg().map(Value::Int),
            Value::Float(v) => Some(Value::Float(-v)),
        }
    }

    fn combine(
        self,
        rhs: Value,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Option<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => int_op(a, b).map(Value::Int),
            (a, b) => Some(Value::Float(float_op(a.as_f64(), b.as_f64()))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}
