//! Runtime values and the arithmetic folding rules shared by the
//! global table builder and the evaluator.

mod operand;
mod value;

pub use operand::{fold_binary, fold_unary, FoldError, Operand};
pub use value::{NumericKind, Value, FLOAT_TYPE, INT_TYPE};
