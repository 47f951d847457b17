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


use std::fmt;
use thiserror::Error;

/// Where the parser stopped when it could not continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Token {
        text: String,
        line: usize,
        column: usize,
    },
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Token { text, line, column } => {
                write!(f, "token \"{}\" at {}:{}", text, line, column)
            }
            Found::EndOfInput => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{line}:{column}: invalid input text \"{text}\"")]
    Lexical {
        text: String,
        line: usize,
        column: usize,
    },
    #[error("unexpected {found} (expected {expected})")]
    Syntax { expected: &'static str, found: Found },
    #[error("{line}:{column}: parentheses nested deeper than {limit}")]
    TooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}

/// Precondition violation on the roller APIs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument: {0}")]
pub struct InvalidArgument(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("division by zero in `{context}`")]
    DivideByZero { context: String },
    #[error("integer overflow in `{context}`")]
    Overflow { context: String },
    #[error("cannot roll `{context}`: {source}")]
    InvalidDice {
        context: String,
        source: InvalidArgument,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}
