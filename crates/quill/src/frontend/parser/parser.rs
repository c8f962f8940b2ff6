//! Quill recursive descent parser

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};
use crate::types::Value;
use std::rc::Rc;

/// Quill parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Parse a complete program (file)
    pub fn parse_program(&mut self) -> CompileResult<Program> {
        let start = self.lexer.peek()?.span;
        let mut items = Vec::new();

        self.skip_separators()?;
        while !self.check(&TokenKind::Eof)? {
            items.push(self.parse_item()?);
            if self.check(&TokenKind::Eof)? {
                break;
            }
            self.expect_separator()?;
        }

        let end = self.lexer.peek()?.span;
        Ok(Program::new(items, start.to(end)))
    }

    // ==================== Items ====================

    fn parse_item(&mut self) -> CompileResult<Item> {
        if self.check(&TokenKind::Func)? {
            let func = self.parse_function_decl()?;
            let span = func.span;
            Ok(Item::new(ItemKind::Function(Rc::new(func)), span))
        } else if self.check_declaration_start()? {
            let decl = self.parse_var_decl()?;
            let span = decl.span;
            Ok(Item::new(ItemKind::Variable(decl), span))
        } else {
            let token = self.lexer.next_token()?;
            Err(CompileError::parser(
                format!("expected a declaration, found {}", token.kind),
                token.span,
            ))
        }
    }

    fn parse_function_decl(&mut self) -> CompileResult<FunctionDecl> {
        let start = self.expect(TokenKind::Func)?.span;
        let (name, _) = self.expect_identifier()?;

        let mut params = Vec::new();
        if self.match_token(&TokenKind::LParen)? {
            if !self.check(&TokenKind::RParen)? {
                params.push(self.parse_param()?);
                while self.match_token(&TokenKind::Comma)? {
                    params.push(self.parse_param()?);
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        let return_type = self.parse_type_annotation()?;
        let (body, end) = self.parse_body()?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span: start.to(end),
        })
    }

    fn parse_param(&mut self) -> CompileResult<VarDecl> {
        let start = self.lexer.peek()?.span;
        let constant = self.parse_mutability()?;
        let (name, _) = self.expect_identifier()?;
        let ty = self.parse_type_annotation()?;
        let init = if self.match_token(&TokenKind::Eq)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = init.as_ref().map_or(ty.span, |e| e.span);
        Ok(VarDecl::new(constant, name, ty, init, start.to(end)))
    }

    fn parse_body(&mut self) -> CompileResult<(Vec<Stmt>, Span)> {
        if self.match_token(&TokenKind::Arrow)? {
            let stmt = self.parse_statement()?;
            let end = stmt.span;
            return Ok((vec![stmt], end));
        }

        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();

        self.skip_separators()?;
        while !self.check(&TokenKind::RBrace)? {
            stmts.push(self.parse_statement()?);
            if self.check(&TokenKind::RBrace)? {
                break;
            }
            self.expect_separator()?;
        }

        let end = self.expect(TokenKind::RBrace)?.span;
        Ok((stmts, end))
    }

    // ==================== Statements ====================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        if self.check(&TokenKind::Func)? {
            let func = self.parse_function_decl()?;
            let span = func.span;
            return Ok(Stmt::new(StmtKind::Function(Rc::new(func)), span));
        }

        if self.check_declaration_start()? {
            let decl = self.parse_var_decl()?;
            let span = decl.span;
            return Ok(Stmt::new(StmtKind::Variable(decl), span));
        }

        // `name = expr` needs one token of lookahead past the identifier
        if self.check(&TokenKind::Identifier(String::new()))?
            && self.lexer.check_lookahead(&TokenKind::Eq)?
        {
            let (target, target_span) = self.expect_identifier()?;
            self.expect(TokenKind::Eq)?;
            let value = self.parse_expr()?;
            let span = target_span.to(value.span);
            return Ok(Stmt::new(
                StmtKind::Assign {
                    target,
                    target_span,
                    value,
                },
                span,
            ));
        }

        let expr = self.parse_expr()?;
        let span = expr.span;
        Ok(Stmt::new(StmtKind::Expr(expr), span))
    }

    fn parse_var_decl(&mut self) -> CompileResult<VarDecl> {
        let start = self.lexer.peek()?.span;
        let late_init = self.match_token(&TokenKind::LateInit)?;
        let constant = self.parse_mutability()?;
        let (name, _) = self.expect_identifier()?;
        let ty = self.parse_type_annotation()?;

        let init = if self.check(&TokenKind::Eq)? {
            let eq = self.lexer.next_token()?;
            if late_init {
                return Err(CompileError::parser(
                    format!("lateinit declaration of `{name}` cannot have an initializer"),
                    eq.span,
                ));
            }
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = init.as_ref().map_or(ty.span, |e| e.span);
        let mut decl = VarDecl::new(constant, name, ty, init, start.to(end));
        decl.late_init = late_init;
        Ok(decl)
    }

    /// `var` or `val`; returns true for the assign-once `val`
    fn parse_mutability(&mut self) -> CompileResult<bool> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Var => Ok(false),
            TokenKind::Val => Ok(true),
            other => Err(CompileError::parser(
                format!("expected var or val, found {other}"),
                token.span,
            )),
        }
    }

    fn parse_type_annotation(&mut self) -> CompileResult<TypeRef> {
        self.expect(TokenKind::Colon)?;
        let (name, span) = self.expect_identifier()?;
        Ok(TypeRef::new(name, span))
    }

    // ==================== Expressions ====================

    fn parse_expr(&mut self) -> CompileResult<Expr> {
        self.parse_expr_with_precedence(0)
    }

    fn parse_expr_with_precedence(&mut self, min_prec: u8) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op()? {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.lexer.next_token()?; // consume operator
            let right = self.parse_expr_with_precedence(prec + 1)?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn peek_binary_op(&mut self) -> CompileResult<Option<BinOp>> {
        Ok(match &self.lexer.peek()?.kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            _ => None,
        })
    }

    fn parse_unary_expr(&mut self) -> CompileResult<Expr> {
        let start = self.lexer.peek()?.span;

        let op = if self.match_token(&TokenKind::Minus)? {
            UnaryOp::Neg
        } else if self.match_token(&TokenKind::Plus)? {
            UnaryOp::Plus
        } else {
            return self.parse_primary_expr();
        };

        if op == UnaryOp::Neg {
            if let Some(expr) = self.parse_negative_limit(start)? {
                return Ok(expr);
            }
        }

        let operand = self.parse_unary_expr()?;
        let span = start.to(operand.span);
        Ok(Expr::unary(op, operand, span))
    }

    /// `-9223372036854775808` only fits an `Int` with its sign attached
    fn parse_negative_limit(&mut self, start: Span) -> CompileResult<Option<Expr>> {
        let token = self.lexer.peek()?;
        let TokenKind::IntLiteral(text) = &token.kind else {
            return Ok(None);
        };
        if text.parse::<i64>().is_ok() {
            return Ok(None);
        }
        let Ok(value) = format!("-{text}").parse::<i64>() else {
            return Ok(None);
        };

        let end = token.span;
        self.lexer.next_token()?;
        Ok(Some(Expr::number(Value::Int(value), start.to(end))))
    }

    fn parse_primary_expr(&mut self) -> CompileResult<Expr> {
        let token = self.lexer.next_token()?;

        match token.kind {
            TokenKind::IntLiteral(text) => {
                let value = text.parse::<i64>().map_err(|_| {
                    CompileError::parser(format!("integer literal `{text}` is out of range"), token.span)
                })?;
                Ok(Expr::number(Value::Int(value), token.span))
            }
            TokenKind::FloatLiteral(text) => {
                let value = text.parse::<f64>().map_err(|_| {
                    CompileError::parser(format!("invalid float literal `{text}`"), token.span)
                })?;
                Ok(Expr::number(Value::Float(value), token.span))
            }
            TokenKind::Identifier(name) => Ok(Expr::symbol(name, token.span)),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                let close = self.expect(TokenKind::RParen)?;
                Ok(Expr::new(inner.kind, token.span.to(close.span)))
            }
            other => Err(CompileError::parser(
                format!("expected expression, found {other}"),
                token.span,
            )),
        }
    }

    // ==================== Helpers ====================

    fn check_declaration_start(&mut self) -> CompileResult<bool> {
        Ok(self.check(&TokenKind::Var)?
            || self.check(&TokenKind::Val)?
            || self.check(&TokenKind::LateInit)?)
    }

    /// Consume any run of newlines and semicolons; true if at least one was eaten
    fn skip_separators(&mut self) -> CompileResult<bool> {
        let mut skipped = false;
        while self.match_token(&TokenKind::Newline)? || self.match_token(&TokenKind::Semi)? {
            skipped = true;
        }
        Ok(skipped)
    }

    fn expect_separator(&mut self) -> CompileResult<()> {
        if self.skip_separators()? {
            return Ok(());
        }
        let token = self.lexer.next_token()?;
        Err(CompileError::parser(
            format!("expected end of line, found {}", token.kind),
            token.span,
        ))
    }

    fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        self.lexer.check(expected)
    }

    fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        self.lexer.match_token(expected)
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        self.lexer.expect(expected)
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.span)),
            _ => Err(CompileError::parser(
                format!("expected identifier, found {}", token.kind),
                token.span,
            )),
        }
    }
}
