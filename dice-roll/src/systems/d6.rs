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


//! Six-sided pools: hits on 5+, sixes explode, glitches on a majority of ones.

use super::GlitchStatus;
use crate::{
    dice_types::DNotationResult,
    error::{InvalidArgument, RollError},
    parse_and_evaluate,
    random::BaseRoller,
    threshold::{ThresholdParameters, ThresholdRoll},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const SIDES: i64 = 6;

pub const fn params() -> ThresholdParameters {
    ThresholdParameters {
        pass_on: 5,
        explode_on: 6,
    }
}

/// A pool whose size came from a dice notation expression.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct D6PoolRoll {
    pub expression: DNotationResult,
    pub roll: ThresholdRoll,
    pub status: GlitchStatus,
}

/// More than half of all dice (explosions included) showing 1 is a glitch,
/// critical when there are no hits at all.
pub fn classify_glitch(roll: &ThresholdRoll) -> GlitchStatus {
    if roll.ones() * 2 <= roll.rolls.len() {
        GlitchStatus::None
    } else if roll.value() == 0 {
        GlitchStatus::CriticalGlitch
    } else {
        GlitchStatus::Glitch
    }
}

pub fn roll_pool(roller: &BaseRoller, count: i64) -> Result<ThresholdRoll, InvalidArgument> {
    roller.roll_threshold(count, SIDES, params())
}

pub fn roll_pool_expression(roller: &BaseRoller, text: &str) -> Result<D6PoolRoll, RollError> {
    let expression = parse_and_evaluate(roller, text)?;
    let roll = roll_pool(roller, expression.value)?;
    let status = classify_glitch(&roll);
    Ok(D6PoolRoll {
        expression,
        roll,
        status,
    })
}
