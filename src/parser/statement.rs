use crate::ast::{Expr, Function, Stmt};
use crate::error::SyntaxError;
use crate::lexer::Token;
use crate::parser::{Parser, starts_expression};

impl Parser<'_> {
    pub fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.peek() {
            Some(Token::KeywordLet) => self.parse_let(),
            Some(Token::KeywordIf) => self.parse_if(),
            Some(Token::KeywordWhile) => self.parse_while(),
            Some(Token::KeywordFunction) => self.parse_function(),
            Some(Token::KeywordReturn) => self.parse_return(),
            Some(Token::Identifier(_)) if matches!(self.peek_at(1), Some(Token::Assign)) => {
                self.parse_assignment()
            }
            Some(token) if starts_expression(token) => {
                let expr = self.parse_expression()?;
                Ok(Stmt::Expr(expr))
            }
            Some(token) => {
                let message = format!("unexpected token {token:?} at start of statement");
                Err(self.error(message))
            }
            None => Err(self.error("expected a statement, reached end of input")),
        }
    }

    fn parse_let(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance(); // consume 'let'
        let name = self.expect_identifier("expected a variable name after 'let'")?;
        self.expect(&Token::Assign, "expected '=' after variable name")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Let { name, value })
    }

    fn parse_assignment(&mut self) -> Result<Stmt, SyntaxError> {
        let name = self.expect_identifier("expected a variable name")?;
        self.advance(); // consume '='
        let value = self.parse_expression()?;
        Ok(Stmt::Assign { name, value })
    }

    fn parse_return(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance(); // consume 'return'
        let value = self.parse_expression()?;
        Ok(Stmt::Return(value))
    }

    fn parse_if(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance(); // consume 'if'
        let condition = self.parse_condition()?;
        let then_body = self.parse_block()?;
        let else_body = if let Some(Token::KeywordElse) = self.peek() {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance(); // consume 'while'
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_function(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance(); // consume 'function'
        let name = self.expect_identifier("expected a function name after 'function'")?;
        self.expect(&Token::LParen, "expected '(' after function name")?;

        let mut params = Vec::new();
        loop {
            let eof_span = self.peek_span();
            match self.advance() {
                Some((Token::RParen, _)) => break,
                Some((Token::Identifier(param), _)) => {
                    params.push(param);
                    // The comma between parameters is optional.
                    if let Some(Token::Comma) = self.peek() {
                        self.advance();
                    }
                }
                Some((token, span)) => {
                    return Err(SyntaxError {
                        message: format!("expected a parameter name or ')', found {token:?}"),
                        span,
                    });
                }
                None => {
                    return Err(SyntaxError {
                        message: "unclosed parameter list, expected ')'".to_string(),
                        span: eof_span,
                    });
                }
            }
        }

        let body = self.parse_block()?;
        Ok(Stmt::Function(Function { name, params, body }))
    }

    fn parse_condition(&mut self) -> Result<Expr, SyntaxError> {
        self.expect(&Token::LParen, "expected '(' before condition")?;
        let condition = self.parse_expression()?;
        self.expect(&Token::RParen, "expected ')' after condition")?;
        Ok(condition)
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.expect(&Token::LBrace, "expected '{' to open a block")?;
        let mut body = Vec::new();
        loop {
            if let Some(Token::RBrace) = self.peek() {
                self.advance();
                break;
            }
            if self.peek().is_none() {
                return Err(self.error("unclosed block, expected '}'"));
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }
}
