//! Program evaluation

mod evaluator;

pub use evaluator::{BodyPolicy, Evaluator, ENTRY_POINT};
