//! Quill token definitions using logos

use crate::common::Span;
use logos::Logos;
use std::fmt;

/// A token with its kind and source location
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds. Newlines separate statements, so only horizontal
/// whitespace and comments are skipped.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("var")]
    Var,
    #[token("val")]
    Val,
    #[token("func")]
    Func,
    #[token("lateinit")]
    LateInit,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*", priority = 3, callback = |lex| lex.slice().to_string())]
    FloatLiteral(String),
    #[regex(r"[0-9]+", priority = 2, callback = |lex| lex.slice().to_string())]
    IntLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", callback = |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators
    #[token("->")]
    Arrow,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Punctuation
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("\n")]
    Newline,

    // Special
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Var => write!(f, "var"),
            TokenKind::Val => write!(f, "val"),
            TokenKind::Func => write!(f, "func"),
            TokenKind::LateInit => write!(f, "lateinit"),
            TokenKind::FloatLiteral(s) | TokenKind::IntLiteral(s) => write!(f, "{s}"),
            TokenKind::Identifier(s) => write!(f, "{s}"),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semi => write!(f, ";"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}
