//! Parser for boolean formulas in prefix notation.
//!
//! ```text
//! Formula       ::= Constant | Proposition | UnaryFormula | BinaryFormula
//! Constant      ::= "T" | "F"
//! Proposition   ::= [a-z] [0-9]+            (x12 is variable 12)
//! UnaryFormula  ::= "(" "NOT" Formula ")"
//! BinaryFormula ::= "(" BinaryOperator Formula Formula ")"
//! BinaryOperator ::= "AND" | "OR" | "IMPL" | "EQUIV"
//! ```
//!
//! The whole input must be consumed: anything after the formula is an error.

use std::str::FromStr;

use crate::error::{ParseError, ParseErrorKind};
use crate::formula::{BinaryOp, Formula};
use crate::types::Var;

#[derive(Debug, Clone, Eq, PartialEq)]
enum TokenKind {
    LParen,
    RParen,
    Word(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

impl Token {
    fn text(&self) -> String {
        match &self.kind {
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Word(word) => word.clone(),
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => tokens.push(Token {
                kind: TokenKind::LParen,
                offset,
            }),
            ')' => tokens.push(Token {
                kind: TokenKind::RParen,
                offset,
            }),
            _ => {
                let mut word = String::new();
                word.push(c);
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Word(word),
                    offset,
                });
            }
        }
    }
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn next(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::new(self.end, ParseErrorKind::UnexpectedEnd))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::RParen => Ok(()),
            _ => Err(ParseError::new(
                token.offset,
                ParseErrorKind::UnexpectedToken(token.text()),
            )),
        }
    }

    fn formula(&mut self) -> Result<Formula, ParseError> {
        let token = self.next()?;
        match &token.kind {
            TokenKind::LParen => self.compound(),
            TokenKind::RParen => Err(ParseError::new(
                token.offset,
                ParseErrorKind::UnexpectedToken(token.text()),
            )),
            TokenKind::Word(word) => atom(word, token.offset),
        }
    }

    /// Everything after an opening parenthesis.
    fn compound(&mut self) -> Result<Formula, ParseError> {
        let token = self.next()?;
        let keyword = match &token.kind {
            TokenKind::Word(word) => word.as_str(),
            _ => {
                return Err(ParseError::new(
                    token.offset,
                    ParseErrorKind::UnexpectedToken(token.text()),
                ))
            }
        };

        let formula = if keyword == "NOT" {
            Formula::not(self.formula()?)
        } else if let Some(op) = BinaryOp::from_keyword(keyword) {
            let lhs = self.formula()?;
            let rhs = self.formula()?;
            Formula::binary(op, lhs, rhs)
        } else {
            return Err(ParseError::new(
                token.offset,
                ParseErrorKind::UnknownOperator(keyword.to_string()),
            ));
        };

        self.expect_rparen()?;
        Ok(formula)
    }
}

fn atom(word: &str, offset: usize) -> Result<Formula, ParseError> {
    match word {
        "T" => return Ok(Formula::constant(true)),
        "F" => return Ok(Formula::constant(false)),
        _ => {}
    }

    let invalid = || ParseError::new(offset, ParseErrorKind::InvalidVariable(word.to_string()));
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return Err(invalid()),
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    match digits.parse::<u32>() {
        Ok(id) if id > 0 => Ok(Formula::Var(Var::new(id))),
        _ => Err(invalid()),
    }
}

/// Parses a whole input string into a [`Formula`].
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let mut parser = Parser {
        tokens: tokenize(input),
        pos: 0,
        end: input.len(),
    };
    let formula = parser.formula()?;
    if let Some(token) = parser.tokens.get(parser.pos) {
        return Err(ParseError::new(
            token.offset,
            ParseErrorKind::TrailingInput(input[token.offset..].trim_end().to_string()),
        ));
    }
    Ok(formula)
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_formula(s)
    }
}
