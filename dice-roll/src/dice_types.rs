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


#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdditiveOp {
    Add,
    Sub,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MultiplicativeOp {
    Mul,
    Div,
}

/// `Term (('+'|'-') Term)*`
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    pub first: Term,
    pub rest: Vec<(AdditiveOp, Term)>,
}

/// `DFactor (('*'|'/') DFactor)*`
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    pub first: DFactor,
    pub rest: Vec<(MultiplicativeOp, DFactor)>,
}

/// `Value ['d' Value]`
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DFactor {
    Value(Value),
    Dice { count: Value, sides: Value },
}

/// `integer | '(' Expression ')'`
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Constant(i64),
    SubExpression(Box<Expression>),
}

/// The faces produced by one `NdM` instruction, in generation order.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaseRoll {
    pub rolls: Vec<i64>,
}

impl BaseRoll {
    /// Sum of all faces, `None` on overflow.
    pub fn checked_value(&self) -> Option<i64> {
        self.rolls
            .iter()
            .try_fold(0i64, |sum, roll| sum.checked_add(*roll))
    }

    pub fn value(&self) -> i64 {
        self.rolls
            .iter()
            .fold(0i64, |sum, roll| sum.saturating_add(*roll))
    }
}

/// Numeric outcome of an expression together with its expanded rendering.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DNotationResult {
    pub value: i64,
    pub str_value: String,
}

impl fmt::Display for AdditiveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdditiveOp::Add => write!(f, "+"),
            AdditiveOp::Sub => write!(f, "-"),
        }
    }
}

impl fmt::Display for MultiplicativeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiplicativeOp::Mul => write!(f, "*"),
            MultiplicativeOp::Div => write!(f, "/"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (op, term) in &self.rest {
            write!(f, " {} {}", op, term)?;
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (op, factor) in &self.rest {
            write!(f, " {} {}", op, factor)?;
        }
        Ok(())
    }
}

impl fmt::Display for DFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DFactor::Value(value) => write!(f, "{}", value),
            DFactor::Dice { count, sides } => write!(f, "{}d{}", count, sides),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Constant(c) => write!(f, "{}", c),
            Value::SubExpression(expr) => write!(f, "({})", expr),
        }
    }
}

impl fmt::Display for BaseRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, roll) in self.rolls.iter().enumerate() {
            if index > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", roll)?;
        }
        write!(f, "]")
    }
}
