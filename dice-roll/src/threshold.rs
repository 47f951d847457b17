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


//! Exploding threshold ("hit counting") pools.

use crate::{
    error::InvalidArgument,
    random::{check_sides, BaseRoller},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "logging")]
use log::debug;

/// A face `>= pass_on` is a hit; a face `>= explode_on` adds another die.
///
/// Setting `explode_on` above the largest face disables exploding.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdParameters {
    pub pass_on: i64,
    pub explode_on: i64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SingleThresholdRoll {
    pub value: i64,
    /// Set on dice generated by an explosion, not on the die that exploded.
    pub is_explode: bool,
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdRoll {
    pub params: ThresholdParameters,
    pub rolls: Vec<SingleThresholdRoll>,
}

impl ThresholdRoll {
    /// Number of hits.
    pub fn value(&self) -> usize {
        self.rolls
            .iter()
            .filter(|roll| roll.value >= self.params.pass_on)
            .count()
    }

    pub fn hits(&self) -> usize {
        self.value()
    }

    pub fn ones(&self) -> usize {
        self.rolls.iter().filter(|roll| roll.value == 1).count()
    }
}

impl fmt::Display for ThresholdRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, roll) in self.rolls.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            if roll.is_explode {
                write!(f, "({})", roll.value)?;
            } else {
                write!(f, "{}", roll.value)?;
            }
        }
        Ok(())
    }
}

impl BaseRoller {
    /// Rolls `count` dice, resolving each explosion chain before the next die.
    pub fn roll_threshold(
        &self,
        count: i64,
        sides: i64,
        params: ThresholdParameters,
    ) -> Result<ThresholdRoll, InvalidArgument> {
        check_sides(sides)?;
        let count = self.check_count(count)?;
        if params.explode_on < 2 {
            return Err(InvalidArgument(format!(
                "explode threshold {} would explode every die",
                params.explode_on
            )));
        }
        let mut rolls = Vec::with_capacity(count);
        for _ in 0..count {
            let mut face = self.next_die(sides);
            rolls.push(SingleThresholdRoll {
                value: face,
                is_explode: false,
            });
            while face >= params.explode_on {
                if rolls.len() >= self.max_dice() {
                    return Err(InvalidArgument(format!(
                        "explosions exceeded the limit of {} dice",
                        self.max_dice()
                    )));
                }
                face = self.next_die(sides);
                rolls.push(SingleThresholdRoll {
                    value: face,
                    is_explode: true,
                });
            }
        }
        let roll = ThresholdRoll { params, rolls };
        #[cfg(feature = "logging")]
        {
            debug!(
                "threshold roll {}d{} {:?}: {} ({} hits)",
                count,
                sides,
                &params,
                &roll,
                roll.value()
            );
        }
        Ok(roll)
    }
}
