use std::mem;

use tracing::trace;

use crate::{
    ast::{BinOp, Expr, Token},
    error::ParseError,
    lexer::Lexer,
};

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

/// Parse a complete chain expression from text.
pub fn parse_str(input: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(input))?.parse()
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(ParseError::Expected {
                expected: format!("'{}'", expected),
                found: format!("'{}'", self.current_token),
            });
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect_identifier(&mut self, context: &str) -> Result<String, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(ParseError::Expected {
                expected: format!("identifier {}", context),
                found: format!("'{}'", other),
            }),
        }
    }

    /// Parse primary expressions (atoms): literals, sources, bindings,
    /// lambdas, groups and collection literals.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            // Literals
            Token::Float(n) => {
                self.advance()?;
                Ok(Expr::Float(n))
            }
            Token::Integer(n) => {
                self.advance()?;
                Ok(Expr::Integer(n))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::String(s))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Expr::Boolean(b))
            }
            Token::Null => {
                self.advance()?;
                Ok(Expr::Null)
            }
            Token::Absent => {
                self.advance()?;
                Ok(Expr::Absent)
            }

            // Sources
            Token::Dollar => {
                self.advance()?;
                Ok(Expr::Root)
            }
            Token::Collection(name) => {
                self.advance()?;
                Ok(Expr::Collection(name))
            }

            // '@name' or '@name => body'
            Token::At => {
                self.advance()?;
                let name = self.expect_identifier("after '@'")?;

                if self.check(&Token::FatArrow) {
                    self.advance()?;
                    // Lambda bodies extend as far as possible
                    let body = self.parse_expression()?;
                    Ok(Expr::lambda(name, body))
                } else {
                    Ok(Expr::Binding(name))
                }
            }

            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }

            // Unary minus, represented as 0 - operand
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_postfix()?;
                Ok(Expr::binary(BinOp::Subtract, Expr::Integer(0), operand))
            }

            Token::LBrace => {
                self.advance()?;
                self.parse_object_literal()
            }
            Token::LBracket => {
                self.advance()?;
                self.parse_array_literal()
            }

            Token::Identifier(name) => Err(ParseError::UnexpectedToken(format!(
                "bare identifier '{}' (fields are accessed through a binding, e.g. @p.{})",
                name, name
            ))),
            token => Err(ParseError::UnexpectedToken(format!("'{}'", token))),
        }
    }

    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let mut pairs = vec![];

        while !self.check(&Token::RBrace) {
            let key = match mem::replace(&mut self.current_token, Token::Eof) {
                Token::String(s) | Token::Identifier(s) => s,
                other => {
                    return Err(ParseError::Expected {
                        expected: "string or identifier as object key".to_string(),
                        found: format!("'{}'", other),
                    });
                }
            };
            self.advance()?;

            self.expect(Token::Colon)?;

            let value = self.parse_expression()?;
            pairs.push((key, value));

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RBrace)?;
        Ok(Expr::Object(pairs))
    }

    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let elements = self.parse_list(Token::RBracket)?;
        Ok(Expr::Array(elements))
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_list(&mut self, close: Token) -> Result<Vec<Expr>, ParseError> {
        let mut elements = vec![];

        while !self.check(&close) {
            elements.push(self.parse_expression()?);

            if !self.check(&close) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(close)?;
        Ok(elements)
    }

    /// Parse access, member and method-call suffixes.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&Token::LBracket) {
                self.advance()?;

                if self.check(&Token::Question) {
                    self.advance()?;
                    self.expect(Token::RBracket)?;
                    expr = Expr::ExistenceCheck(Box::new(expr));
                } else {
                    let key = self.parse_access_key()?;
                    self.expect(Token::RBracket)?;
                    expr = Expr::access(expr, key);
                }
            } else if self.check(&Token::Dot) {
                self.advance()?;
                let name = self.expect_identifier("after '.'")?;

                if self.check(&Token::LParen) {
                    self.advance()?;
                    let args = self.parse_list(Token::RParen)?;
                    trace!(method = %name, args = args.len(), "parsed method call");
                    expr = Expr::call(expr, name, args);
                } else {
                    expr = Expr::member(expr, name);
                }
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_access_key(&mut self) -> Result<Expr, ParseError> {
        // Inside brackets, we can have:
        // 1. Identifier -> Key (simple field name)
        // 2. String -> Key (field name with special chars)
        // 3. Anything else -> expression (index or computed key)
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) | Token::String(name) => {
                self.advance()?;
                Ok(Expr::Key(name))
            }
            other => {
                self.current_token = other;
                self.parse_expression()
            }
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_postfix()?;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                Token::Percent => BinOp::Modulo,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_postfix()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match &self.current_token {
            Token::EqEq => BinOp::Equal,
            Token::NotEq => BinOp::NotEqual,
            Token::Lt => BinOp::LessThan,
            Token::Gt => BinOp::GreaterThan,
            Token::LtEq => BinOp::LessEqual,
            Token::GtEq => BinOp::GreaterEqual,
            _ => return Ok(left),
        };

        self.advance()?;
        let right = self.parse_additive()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(&Token::And) {
            self.advance()?;
            let right = self.parse_comparison()?;
            left = Expr::binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::Or) {
            self.advance()?;
            let right = self.parse_and()?;
            left = Expr::binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a whole input as one expression.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}
