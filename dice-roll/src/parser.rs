/*
Copyright 2021 Robin Marchart

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/


//! Dice notation front end: shorthand normalisation, tokenizer and a
//! recursive-descent parser with one function per precedence level.

use crate::{
    dice_types::{AdditiveOp, DFactor, Expression, MultiplicativeOp, Term, Value},
    error::{Found, ParseError},
};

use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, digit1},
    combinator::{map, map_res},
    IResult,
};

#[cfg(feature = "logging")]
use log::debug;

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_NESTING: usize = 64;

/// Rewrites every `d` that does not follow a digit into `1d`.
///
/// The rule looks only at the preceding character, so `d20 + d8` becomes
/// `1d20 + 1d8` while `2d6` is left alone.
pub fn preprocess_roll(input: &str) -> String {
    normalize(input).0
}

/// Normalised text plus the byte offsets of every inserted `1`.
fn normalize(input: &str) -> (String, Vec<usize>) {
    let mut normalized = String::with_capacity(input.len() + 4);
    let mut inserted = Vec::new();
    let mut previous: Option<char> = None;
    for c in input.chars() {
        if c == 'd' && !previous.map_or(false, |p| p.is_ascii_digit()) {
            inserted.push(normalized.len());
            normalized.push('1');
        }
        normalized.push(c);
        previous = Some(c);
    }
    (normalized, inserted)
}

/// Reports positions in the text the user typed, not the normalised one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Locator<'a> {
    original: &'a str,
    inserted: &'a [usize],
}

impl<'a> Locator<'a> {
    pub fn identity(input: &'a str) -> Locator<'a> {
        Locator {
            original: input,
            inserted: &[],
        }
    }

    /// 1-based line and column of a byte offset into the normalised text.
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let shift = self.inserted.iter().filter(|i| **i < offset).count();
        line_column(self.original, offset - shift)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Integer(i64),
    Plus,
    Minus,
    Star,
    Slash,
    Dice,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

fn parse_token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        map_res(digit1, |s: &str| s.parse::<i64>().map(TokenKind::Integer)),
        map(char('+'), |_| TokenKind::Plus),
        map(char('-'), |_| TokenKind::Minus),
        map(char('*'), |_| TokenKind::Star),
        map(char('/'), |_| TokenKind::Slash),
        map(char('d'), |_| TokenKind::Dice),
        map(char('('), |_| TokenKind::LeftParen),
        map(char(')'), |_| TokenKind::RightParen),
    ))(input)
}

/// 1-based line and column of a byte offset.
fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset.min(input.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |l| l.chars().count())
        + 1;
    (line, column)
}

fn is_token_boundary(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_digit() || "+-*/()d".contains(c)
}

/// The offending lexeme: an over-long integer or a run of unknown characters.
fn unrecognized(input: &str) -> &str {
    let lexeme: IResult<&str, &str> = alt((digit1, take_till1(is_token_boundary)))(input);
    match lexeme {
        Ok((_, text)) => text,
        Err(_) => input.split_whitespace().next().unwrap_or(input),
    }
}

pub(crate) fn tokenize<'a>(
    input: &'a str,
    locator: &Locator<'_>,
) -> Result<Vec<Token<'a>>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(tokens);
        }
        let offset = input.len() - rest.len();
        match parse_token(rest) {
            Ok((remaining, kind)) => {
                tokens.push(Token {
                    kind,
                    text: &rest[..rest.len() - remaining.len()],
                    offset,
                });
                rest = remaining;
            }
            Err(_) => {
                let (line, column) = locator.line_column(offset);
                return Err(ParseError::Lexical {
                    text: unrecognized(rest).to_string(),
                    line,
                    column,
                });
            }
        }
    }
}

struct Parser<'a> {
    locator: Locator<'a>,
    tokens: Vec<Token<'a>>,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.position).map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let kind = self.peek();
        if kind.is_some() {
            self.position += 1;
        }
        kind
    }

    fn starts_value(&self) -> bool {
        matches!(
            self.peek(),
            Some(TokenKind::Integer(_)) | Some(TokenKind::LeftParen)
        )
    }

    fn error(&self, expected: &'static str) -> ParseError {
        let found = match self.tokens.get(self.position) {
            Some(token) => {
                let (line, column) = self.locator.line_column(token.offset);
                Found::Token {
                    text: token.text.to_string(),
                    line,
                    column,
                }
            }
            None => Found::EndOfInput,
        };
        ParseError::Syntax { expected, found }
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        if !self.starts_value() {
            return Err(self.error("Expression"));
        }
        let first = self.term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => AdditiveOp::Add,
                Some(TokenKind::Minus) => AdditiveOp::Sub,
                _ => break,
            };
            self.advance();
            if !self.starts_value() {
                return Err(self.error("Term"));
            }
            rest.push((op, self.term()?));
        }
        Ok(Expression { first, rest })
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        let first = self.dfactor()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => MultiplicativeOp::Mul,
                Some(TokenKind::Slash) => MultiplicativeOp::Div,
                _ => break,
            };
            self.advance();
            if !self.starts_value() {
                return Err(self.error("DFactor"));
            }
            rest.push((op, self.dfactor()?));
        }
        Ok(Term { first, rest })
    }

    fn dfactor(&mut self) -> Result<DFactor, ParseError> {
        let count = self.value()?;
        if self.peek() != Some(TokenKind::Dice) {
            return Ok(DFactor::Value(count));
        }
        self.advance();
        if !self.starts_value() {
            return Err(self.error("Value"));
        }
        let sides = self.value()?;
        Ok(DFactor::Dice { count, sides })
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some(TokenKind::Integer(i)) => {
                self.advance();
                Ok(Value::Constant(i))
            }
            Some(TokenKind::LeftParen) => {
                if self.depth >= MAX_NESTING {
                    let (line, column) = self.locator.line_column(self.tokens[self.position].offset);
                    return Err(ParseError::TooDeep {
                        limit: MAX_NESTING,
                        line,
                        column,
                    });
                }
                self.advance();
                self.depth += 1;
                let inner = self.expression()?;
                if self.peek() != Some(TokenKind::RightParen) {
                    return Err(self.error("\")\""));
                }
                self.advance();
                self.depth -= 1;
                Ok(Value::SubExpression(Box::new(inner)))
            }
            _ => Err(self.error("Value")),
        }
    }
}

fn parse_located(input: &str, locator: Locator<'_>) -> Result<Expression, ParseError> {
    let tokens = tokenize(input, &locator)?;
    let mut parser = Parser {
        locator,
        tokens,
        position: 0,
        depth: 0,
    };
    let expression = parser.expression()?;
    if parser.position < parser.tokens.len() {
        return Err(parser.error("end of input"));
    }
    #[cfg(feature = "logging")]
    {
        debug!("parsed {:?} as {}", input, &expression);
    }
    Ok(expression)
}

/// Parses already normalised text into an [`Expression`].
pub fn parse_normalized(input: &str) -> Result<Expression, ParseError> {
    parse_located(input, Locator::identity(input))
}

/// Normalises `d<N>` shorthand and parses the result.
///
/// Error positions refer to `input` as typed.
pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    let (normalized, inserted) = normalize(input);
    parse_located(
        &normalized,
        Locator {
            original: input,
            inserted: &inserted,
        },
    )
}
