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


//! Dice notation parsing and evaluation, plus exploding threshold pools for
//! six- and ten-sided systems.

pub mod dice_roll;
pub mod dice_types;
pub mod error;
pub mod parser;
pub mod random;
pub mod systems;
pub mod threshold;

pub use dice_roll::ExpressionEvaluate;
pub use dice_types::{
    AdditiveOp, BaseRoll, DFactor, DNotationResult, Expression, MultiplicativeOp, Term, Value,
};
pub use error::{EvaluationError, Found, InvalidArgument, ParseError, RollError};
pub use parser::preprocess_roll;
pub use random::{BaseRoller, RandomSource, RngSource, ScriptedSource};
pub use systems::GlitchStatus;
pub use threshold::{SingleThresholdRoll, ThresholdParameters, ThresholdRoll};

/// Normalises shorthand and parses `text` without rolling anything.
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    parser::parse_expression(text)
}

/// Parses `text` and evaluates it, rolling every dice term once.
pub fn parse_and_evaluate(roller: &BaseRoller, text: &str) -> Result<DNotationResult, RollError> {
    let expression = parse(text)?;
    Ok(expression.evaluate(roller)?)
}
