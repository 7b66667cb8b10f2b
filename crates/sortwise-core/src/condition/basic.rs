//! A small condition language covering the common checks.
//!
//! ```text
//! expr    := and ("or" and)*
//! and     := unary ("and" unary)*
//! unary   := "not" unary | primary
//! primary := "(" expr ")" | "true" | "false" | func "(" string ")"
//! func    := "file" | "active"
//! ```
//!
//! Keywords and function names are case-insensitive. Strings are double
//! quoted; `\"` inside a string is a literal quote.
use crate::condition::error::ConditionError;
use crate::condition::{ConditionEvaluator, GameState};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Word(String),
    Str(String),
}

fn tokenize(condition: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = condition.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' if chars.peek() == Some(&'"') => {
                            chars.next();
                            value.push('"');
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => value.push(other),
                    }
                }
                if !closed {
                    return Err(ConditionError::parse(condition, "unterminated string"));
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word.to_lowercase()));
            }
            other => {
                return Err(ConditionError::parse(
                    condition,
                    format!("unexpected character '{}'", other),
                ));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    condition: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    state: &'a GameState,
}

impl<'a> Parser<'a> {
    fn peek_word(&self, word: &str) -> bool {
        matches!(self.tokens.get(self.pos), Some(Token::Word(w)) if w == word)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ConditionError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            _ => Err(ConditionError::parse(self.condition, format!("expected {}", what))),
        }
    }

    fn expr(&mut self) -> Result<bool, ConditionError> {
        let mut value = self.and()?;
        while self.peek_word("or") {
            self.pos += 1;
            let rhs = self.and()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn and(&mut self) -> Result<bool, ConditionError> {
        let mut value = self.unary()?;
        while self.peek_word("and") {
            self.pos += 1;
            let rhs = self.unary()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<bool, ConditionError> {
        if self.peek_word("not") {
            self.pos += 1;
            return Ok(!self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<bool, ConditionError> {
        match self.next() {
            Some(Token::Open) => {
                let value = self.expr()?;
                self.expect(Token::Close, "')'")?;
                Ok(value)
            }
            Some(Token::Word(word)) => match word.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                "file" | "active" => {
                    self.expect(Token::Open, "'(' after function name")?;
                    let arg = match self.next() {
                        Some(Token::Str(arg)) => arg,
                        _ => {
                            return Err(ConditionError::parse(
                                self.condition,
                                format!("{}() takes a quoted file name", word),
                            ));
                        }
                    };
                    self.expect(Token::Close, "')'")?;
                    Ok(if word == "file" {
                        self.state.is_installed(&arg)
                    } else {
                        self.state.is_active(&arg)
                    })
                }
                _ => Err(ConditionError::UnknownFunction {
                    condition: self.condition.to_string(),
                    function: word.clone(),
                }),
            },
            Some(Token::Str(_)) => Err(ConditionError::parse(self.condition, "unexpected string")),
            Some(Token::Close) => Err(ConditionError::parse(self.condition, "unexpected ')'")),
            None => Err(ConditionError::parse(self.condition, "unexpected end of condition")),
        }
    }
}

/// Evaluator for the built-in condition language
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConditionEvaluator;

impl BasicConditionEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ConditionEvaluator for BasicConditionEvaluator {
    fn evaluate(&self, condition: &str, state: &GameState) -> Result<bool, ConditionError> {
        let tokens = tokenize(condition)?;
        if tokens.is_empty() {
            return Ok(true);
        }

        let mut parser = Parser {
            condition,
            tokens,
            pos: 0,
            state,
        };
        let value = parser.expr()?;
        if parser.pos < parser.tokens.len() {
            return Err(ConditionError::parse(condition, "trailing input"));
        }
        Ok(value)
    }
}
