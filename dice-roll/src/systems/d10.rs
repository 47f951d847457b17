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


//! Ten-sided pools: hits on 8+, tens explode (or nines/eights with the
//! again flags), and a chance die when the pool runs dry.

use super::GlitchStatus;
use crate::{
    dice_types::DNotationResult,
    error::{Found, ParseError, RollError},
    parse_and_evaluate,
    random::BaseRoller,
    threshold::{ThresholdParameters, ThresholdRoll},
};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    combinator::{eof, map},
    sequence::terminated,
    IResult,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use log::debug;

pub const SIDES: i64 = 10;

pub const fn default_params() -> ThresholdParameters {
    ThresholdParameters {
        pass_on: 8,
        explode_on: 10,
    }
}

/// Succeeds only on a ten and never explodes.
pub const fn chance_params() -> ThresholdParameters {
    ThresholdParameters {
        pass_on: 10,
        explode_on: 11,
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Flag {
    EightAgain,
    NineAgain,
    Chance,
}

fn parse_flag(input: &str) -> IResult<&str, Flag> {
    terminated(
        alt((
            map(alt((tag_no_case("8-again"), tag_no_case("8again"))), |_| {
                Flag::EightAgain
            }),
            map(alt((tag_no_case("9-again"), tag_no_case("9again"))), |_| {
                Flag::NineAgain
            }),
            map(tag_no_case("chance"), |_| Flag::Chance),
        )),
        eof,
    )(input)
}

/// Control flags split off the front of a command, plus the pool expression.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PoolSetup {
    pub params: ThresholdParameters,
    pub chance: bool,
    pub expression: String,
}

/// Consumes leading `8again`, `9again` and `chance` tokens in any order.
///
/// When both again flags are present the lower threshold applies.
pub fn build_params<S: AsRef<str>>(tokens: &[S]) -> Result<PoolSetup, ParseError> {
    let mut params = default_params();
    let mut chance = false;
    let mut consumed = 0;
    for token in tokens {
        match parse_flag(token.as_ref()) {
            Ok((_, Flag::EightAgain)) => params.explode_on = params.explode_on.min(8),
            Ok((_, Flag::NineAgain)) => params.explode_on = params.explode_on.min(9),
            Ok((_, Flag::Chance)) => chance = true,
            Err(_) => break,
        }
        consumed += 1;
    }
    let expression = tokens[consumed..]
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    if expression.trim().is_empty() && !chance {
        return Err(ParseError::Syntax {
            expected: "Expression",
            found: Found::EndOfInput,
        });
    }
    Ok(PoolSetup {
        params,
        chance,
        expression,
    })
}

/// A chance die showing 1 is a dramatic failure.
pub fn classify_chance(roll: &ThresholdRoll) -> GlitchStatus {
    match roll.rolls.first() {
        Some(first) if first.value == 1 => GlitchStatus::CriticalGlitch,
        _ => GlitchStatus::None,
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct D10PoolRoll {
    /// Pool size computed from the expression, before the chance rule.
    pub pool: i64,
    pub expression: Option<DNotationResult>,
    pub chance: bool,
    pub roll: ThresholdRoll,
    pub status: GlitchStatus,
}

/// Evaluates the pool expression and rolls it.
///
/// A chance roll always uses [`chance_params`]; any again flags only apply
/// to regular pools.
pub fn roll_pool<S: AsRef<str>>(roller: &BaseRoller, tokens: &[S]) -> Result<D10PoolRoll, RollError> {
    let setup = build_params(tokens)?;
    let expression = if setup.expression.trim().is_empty() {
        None
    } else {
        Some(parse_and_evaluate(roller, &setup.expression)?)
    };
    let pool = expression.as_ref().map_or(0, |e| e.value);
    let chance = setup.chance || pool < 1;
    #[cfg(feature = "logging")]
    {
        debug!("d10 pool {} with {:?}, chance: {}", pool, &setup.params, chance);
    }
    let (roll, status) = if chance {
        let roll = roller.roll_threshold(1, SIDES, chance_params())?;
        let status = classify_chance(&roll);
        (roll, status)
    } else {
        (
            roller.roll_threshold(pool, SIDES, setup.params)?,
            GlitchStatus::None,
        )
    };
    Ok(D10PoolRoll {
        pool,
        expression,
        chance,
        roll,
        status,
    })
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::random::ScriptedSource;

    fn with_explode(explode_on: i64) -> ThresholdParameters {
        ThresholdParameters {
            pass_on: 8,
            explode_on,
        }
    }

    #[test]
    fn test_build_params_defaults() {
        assert_eq!(
            build_params(&["3", "+", "2"]),
            Ok(PoolSetup {
                params: default_params(),
                chance: false,
                expression: "3 + 2".to_string()
            })
        );
    }

    #[test]
    fn test_build_params_flags_any_order() {
        assert_eq!(build_params(&["8again", "5"]).unwrap().params, with_explode(8));
        assert_eq!(build_params(&["9-again", "5"]).unwrap().params, with_explode(9));
        assert_eq!(
            build_params(&["9again", "8again", "5"]).unwrap().params,
            with_explode(8)
        );
        assert_eq!(
            build_params(&["8-Again", "9AGAIN", "5"]).unwrap().params,
            with_explode(8)
        );
        let setup = build_params(&["chance", "9again", "d10"]).unwrap();
        assert!(setup.chance);
        assert_eq!(setup.params, with_explode(9));
        assert_eq!(setup.expression, "d10");
    }

    #[test]
    fn test_build_params_only_leading_flags() {
        let setup = build_params(&["4", "8again"]).unwrap();
        assert_eq!(setup.params, default_params());
        assert_eq!(setup.expression, "4 8again");
        assert_eq!(build_params(&["8againx", "1"]).unwrap().expression, "8againx 1");
    }

    #[test]
    fn test_build_params_missing_expression() {
        assert_eq!(
            build_params(&["8again"]),
            Err(ParseError::Syntax {
                expected: "Expression",
                found: Found::EndOfInput
            })
        );
        assert!(build_params::<&str>(&[]).is_err());
        assert_eq!(build_params(&["chance"]).unwrap().expression, "");
    }

    #[test]
    fn test_roll_pool_nine_again() {
        let roller = BaseRoller::new(ScriptedSource::new(vec![9, 3, 10, 8, 1]));
        let rolled = roll_pool(&roller, &["9again", "2", "+", "1"]).unwrap();
        assert_eq!(rolled.pool, 3);
        assert!(!rolled.chance);
        assert_eq!(rolled.roll.to_string(), "9 (3) 10 (8) 1");
        assert_eq!(rolled.roll.value(), 3);
        assert_eq!(rolled.status, GlitchStatus::None);
    }

    #[test]
    fn test_roll_pool_chance() {
        let roller = BaseRoller::new(ScriptedSource::new(vec![10]));
        let rolled = roll_pool(&roller, &["chance", "5"]).unwrap();
        assert_eq!(rolled.pool, 5);
        assert!(rolled.chance);
        assert_eq!(rolled.roll.to_string(), "10");
        assert_eq!(rolled.roll.value(), 1);
        assert_eq!(rolled.status, GlitchStatus::None);

        let roller = BaseRoller::new(ScriptedSource::new(vec![1]));
        let rolled = roll_pool(&roller, &["1", "-", "1"]).unwrap();
        assert_eq!(rolled.pool, 0);
        assert!(rolled.chance);
        assert_eq!(rolled.roll.value(), 0);
        assert_eq!(rolled.status, GlitchStatus::CriticalGlitch);

        let roller = BaseRoller::new(ScriptedSource::new(vec![9]));
        let rolled = roll_pool(&roller, &["chance"]).unwrap();
        assert_eq!(rolled.expression, None);
        assert_eq!(rolled.roll.value(), 0);
        assert_eq!(rolled.status, GlitchStatus::None);
    }

    #[test]
    fn test_chance_roll_ignores_again_flags() {
        let roller = BaseRoller::new(ScriptedSource::new(vec![8, 5]));
        let rolled = roll_pool(&roller, &["8again", "chance", "3"]).unwrap();
        assert_eq!(rolled.roll.params, chance_params());
        assert_eq!(rolled.roll.to_string(), "8");
        assert_eq!(rolled.roll.value(), 0);
    }

    #[test]
    fn test_roll_pool_errors() {
        let roller = BaseRoller::seeded(9);
        assert!(matches!(
            roll_pool(&roller, &["3", "/", "0"]),
            Err(RollError::Evaluation(_))
        ));
        assert!(matches!(
            roll_pool(&roller, &["8again", "x"]),
            Err(RollError::Parse(ParseError::Lexical { .. }))
        ));
    }
}
