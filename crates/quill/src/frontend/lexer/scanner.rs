//! Token stream over a Quill source file

use std::collections::VecDeque;
use std::mem::discriminant;

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for Quill source code, with unbounded lookahead
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    lookahead: VecDeque<Token>,
    exhausted: bool,
}

fn same_kind(a: &TokenKind, b: &TokenKind) -> bool {
    discriminant(a) == discriminant(b)
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            lookahead: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Consume and return the next token. Once the source is exhausted
    /// every call yields `Eof`.
    pub fn next_token(&mut self) -> CompileResult<Token> {
        match self.lookahead.pop_front() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> CompileResult<Token> {
        if !self.exhausted {
            if let Some(result) = self.inner.next() {
                let range = self.inner.span();
                let span = Span::new(range.start, range.end);
                return match result {
                    Ok(kind) => Ok(Token::new(kind, span)),
                    Err(()) => Err(CompileError::lexer(
                        format!("unrecognized character '{}'", self.inner.slice()),
                        span,
                    )),
                };
            }
            self.exhausted = true;
        }

        let end = self.inner.source().len();
        Ok(Token::new(TokenKind::Eof, Span::new(end, end)))
    }

    pub fn peek(&mut self) -> CompileResult<&Token> {
        self.peek_at(0)
    }

    /// Token `offset` positions ahead, 0 being the next one
    pub fn peek_at(&mut self, offset: usize) -> CompileResult<&Token> {
        while self.lookahead.len() <= offset {
            let token = self.scan()?;
            self.lookahead.push_back(token);
        }
        Ok(&self.lookahead[offset])
    }

    pub fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        Ok(same_kind(&self.peek()?.kind, expected))
    }

    /// Like [`check`](Self::check), one token further ahead
    pub fn check_lookahead(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        Ok(same_kind(&self.peek_at(1)?.kind, expected))
    }

    /// Consume the next token when it has the expected kind
    pub fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        let matched = self.check(expected)?;
        if matched {
            self.lookahead.pop_front();
        }
        Ok(matched)
    }

    /// Consume a token of the expected kind or fail with a parse error
    pub fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.next_token()?;
        if !same_kind(&token.kind, &expected) {
            return Err(CompileError::parser(
                format!("expected {expected}, found {}", token.kind),
                token.span,
            ));
        }
        Ok(token)
    }

    /// Every token of the source, ending with `Eof`
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize_all()
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("var val func lateinit valid _tmp x2"),
            vec![
                TokenKind::Var,
                TokenKind::Val,
                TokenKind::Func,
                TokenKind::LateInit,
                ident("valid"),
                ident("_tmp"),
                ident("x2"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(
            kinds("42 3.25 7."),
            vec![
                TokenKind::IntLiteral("42".to_string()),
                TokenKind::FloatLiteral("3.25".to_string()),
                TokenKind::FloatLiteral("7.".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("+ - * / = -> : , ; ( ) { }"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eq,
                TokenKind::Arrow,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Semi,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_survive_comments() {
        assert_eq!(
            kinds("var # a comment\n\nval"),
            vec![TokenKind::Var, TokenKind::Newline, TokenKind::Newline, TokenKind::Val, TokenKind::Eof]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("func main() : Int -> 0").tokenize_all().unwrap();
        assert_eq!(tokens[1].kind, ident("main"));
        assert_eq!(tokens[1].span, Span::new(5, 9));
        assert_eq!(tokens.last().unwrap().span, Span::new(22, 22));
    }

    #[test]
    fn test_lookahead_does_not_consume() {
        let mut lexer = Lexer::new("x = 1");
        assert!(lexer.check(&TokenKind::Identifier(String::new())).unwrap());
        assert!(lexer.check_lookahead(&TokenKind::Eq).unwrap());
        assert!(!lexer.match_token(&TokenKind::Eq).unwrap());

        assert_eq!(lexer.next_token().unwrap().kind, ident("x"));
        assert!(lexer.match_token(&TokenKind::Eq).unwrap());
        assert!(lexer.expect(TokenKind::Colon).is_err());
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_unrecognized_character() {
        let mut lexer = Lexer::new("var $");
        assert!(lexer.next_token().is_ok());
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { span, .. } if span == Span::new(4, 5)));
    }
}
