use crate::{ast::Token, error::LexError};

/// Source position (character offset) of a token or error.
pub type Position = usize;

pub struct Lexer {
    input: Vec<char>,
    position: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Offset of the next unread character.
    pub fn position(&self) -> Position {
        self.position
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                position: self.position,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let invalid = |literal: String| LexError::InvalidNumber {
            literal,
            position: start,
        };
        if is_float {
            number
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| invalid(number))
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| invalid(number))
        }
    }

    /// Emit a single-character token.
    fn single(&mut self, token: Token) -> Result<Token, LexError> {
        self.advance();
        Ok(token)
    }

    /// Emit a two-character token.
    fn pair(&mut self, token: Token) -> Result<Token, LexError> {
        self.advance();
        self.advance();
        Ok(token)
    }

    /// Emit `double` if the next character is `second`, otherwise `single`.
    fn one_or_two(&mut self, second: char, double: Token, single: Token) -> Result<Token, LexError> {
        if self.peek_char(1) == Some(second) {
            self.pair(double)
        } else {
            self.single(single)
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('$') => {
                if self
                    .peek_char(1)
                    .is_some_and(|c| c.is_alphabetic() || c == '_')
                {
                    self.advance();
                    Ok(Token::Collection(self.read_identifier()))
                } else {
                    self.single(Token::Dollar)
                }
            }
            Some('@') => self.single(Token::At),
            Some('.') => self.single(Token::Dot),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some('?') => self.single(Token::Question),
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('*') => self.single(Token::Star),
            Some('/') => self.single(Token::Slash),
            Some('%') => self.single(Token::Percent),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some('=') => match self.peek_char(1) {
                Some('=') => self.pair(Token::EqEq),
                Some('>') => self.pair(Token::FatArrow),
                _ => Err(LexError::LoneEquals {
                    position: self.position,
                }),
            },
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.pair(Token::NotEq)
                } else {
                    Err(LexError::UnexpectedChar {
                        ch: '!',
                        position: self.position,
                    })
                }
            }
            Some('>') => self.one_or_two('=', Token::GtEq, Token::Gt),
            Some('<') => self.one_or_two('=', Token::LtEq, Token::Lt),
            Some('"') => self.read_string('"').map(Token::String),
            Some('\'') => self.read_string('\'').map(Token::String),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                Ok(match ident.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "null" => Token::Null,
                    "absent" => Token::Absent,
                    _ => Token::Identifier(ident),
                })
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => Err(LexError::UnexpectedChar {
                ch,
                position: self.position,
            }),
        }
    }

    /// Lex the whole input, including the trailing `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or true false null absent");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(lexer.next_token().unwrap(), Token::Absent);
}

#[test]
fn test_lambda_arrow() {
    let tokens = Lexer::new("@p => @p.age").tokenize().unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::At,
            Token::Identifier("p".to_string()),
            Token::FatArrow,
            Token::At,
            Token::Identifier("p".to_string()),
            Token::Dot,
            Token::Identifier("age".to_string()),
            Token::Eof,
        ]
    );
}
