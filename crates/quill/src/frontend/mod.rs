//! Quill front end
//!
//! Turns source text into a [`Program`](ast::Program):
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::common::CompileResult;
use ast::Program;
use lexer::Lexer;
use parser::Parser;

/// Parse a complete source file
pub fn parse(source: &str) -> CompileResult<Program> {
    Parser::new(source).parse_program()
}

/// Token stream of a source file, one token per line
pub fn dump_tokens(source: &str) -> CompileResult<String> {
    let tokens = Lexer::new(source).tokenize_all()?;
    let mut output = String::new();
    for token in &tokens {
        output.push_str(&format!("{:?}\n", token));
    }
    Ok(output)
}

pub fn dump_ast(program: &Program) -> String {
    format!("{:#?}", program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_tokens_ends_with_eof() {
        let output = dump_tokens("val a : Int = 1").unwrap();
        assert_eq!(output.lines().count(), 7);
        assert!(output.lines().last().unwrap().contains("Eof"));
    }

    #[test]
    fn test_dump_tokens_reports_lexer_errors() {
        assert!(dump_tokens("val a : Int = $").is_err());
    }

    #[test]
    fn test_dump_ast() {
        let program = parse("func main() : Int -> 1").unwrap();
        assert!(dump_ast(&program).contains("FunctionDecl"));
    }
}
