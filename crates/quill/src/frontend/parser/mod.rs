//! Quill parser module

mod parser;

pub use parser::Parser;
