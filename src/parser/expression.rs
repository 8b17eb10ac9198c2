use crate::ast::{BinOp, Expr};
use crate::error::SyntaxError;
use crate::lexer::Token;
use crate::parser::Parser;

impl Parser<'_> {
    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_addition()
    }

    // Precedence tower, low to high: addition, multiplication, comparison,
    // primary. Comparison binding tighter than `+ - * /` is deliberate and
    // load-bearing: `1 + 2 > 3` parses as `1 + (2 > 3)`.
    fn parse_addition(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.parse_multiplication()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplication()?;
            node = Expr::BinOp {
                operator,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.parse_comparison()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            node = Expr::BinOp {
                operator,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    fn parse_comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.parse_primary()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Greater) => BinOp::Greater,
                Some(Token::Less) => BinOp::Less,
                Some(Token::Eq) => BinOp::Eq,
                Some(Token::NotEq) => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            node = Expr::BinOp {
                operator,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let eof_span = self.peek_span();
        let Some((token, span)) = self.advance() else {
            return Err(SyntaxError {
                message: "expected an expression, reached end of input".to_string(),
                span: eof_span,
            });
        };

        match token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::Identifier(name) => {
                if let Some(Token::LParen) = self.peek() {
                    self.parse_call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            // A parenthesized group re-enters at the lowest layer.
            Token::LParen => {
                let node = self.parse_addition()?;
                self.expect(&Token::RParen, "expected ')' to close this group")?;
                Ok(node)
            }
            other => Err(SyntaxError {
                message: format!("expected an expression, found {other:?}"),
                span,
            }),
        }
    }

    /// Comma-separated argument list; zero arguments are fine, but two
    /// arguments with nothing between them are not.
    fn parse_call(&mut self, name: String) -> Result<Expr, SyntaxError> {
        self.advance(); // consume '('
        let mut args = Vec::new();
        loop {
            if let Some(Token::RParen) = self.peek() {
                self.advance();
                break;
            }
            args.push(self.parse_expression()?);

            let eof_span = self.peek_span();
            match self.advance() {
                Some((Token::Comma, _)) => {}
                Some((Token::RParen, _)) => break,
                Some((token, span)) => {
                    return Err(SyntaxError {
                        message: format!("expected ',' or ')' after argument, found {token:?}"),
                        span,
                    });
                }
                None => {
                    return Err(SyntaxError {
                        message: "unclosed argument list, expected ')'".to_string(),
                        span: eof_span,
                    });
                }
            }
        }
        Ok(Expr::Call { name, args })
    }
}
