pub mod expression;
pub mod statement;


use crate::ast::Program;
use crate::error::SyntaxError;
use crate::lexer::{Spanned, Token};

use std::ops::Range;

/// Recursive-descent parser over an immutable token buffer. The cursor
/// index replaces destructive front-removal, so peeking ahead is free.
pub struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned], source_len: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            source_len,
        }
    }

    /// Consumes the whole buffer. Fails fast on the first malformed
    /// construct; no recovery, no partial AST.
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut body = Vec::new();
        while self.peek().is_some() {
            body.push(self.parse_statement()?);
        }
        Ok(Program { body })
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(token, _)| token)
    }

    /// Span of the upcoming token, or an empty span at end of input.
    pub(crate) fn peek_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }

    pub(crate) fn advance(&mut self) -> Option<Spanned> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    pub(crate) fn expect(
        &mut self,
        expected: &Token,
        message: &str,
    ) -> Result<Range<usize>, SyntaxError> {
        let eof_span = self.peek_span();
        match self.advance() {
            Some((token, span)) if &token == expected => Ok(span),
            Some((token, span)) => Err(SyntaxError {
                message: format!("{message}, found {token:?}"),
                span,
            }),
            None => Err(SyntaxError {
                message: format!("{message}, reached end of input"),
                span: eof_span,
            }),
        }
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> Result<String, SyntaxError> {
        let eof_span = self.peek_span();
        match self.advance() {
            Some((Token::Identifier(name), _)) => Ok(name),
            Some((token, span)) => Err(SyntaxError {
                message: format!("{message}, found {token:?}"),
                span,
            }),
            None => Err(SyntaxError {
                message: format!("{message}, reached end of input"),
                span: eof_span,
            }),
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            span: self.peek_span(),
        }
    }
}

/// Tokens that may begin an expression statement.
pub(crate) fn starts_expression(token: &Token) -> bool {
    matches!(
        token,
        Token::Number(_) | Token::Identifier(_) | Token::LParen
    )
}
