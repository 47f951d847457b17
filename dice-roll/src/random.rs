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


//! Random sources and the base roller that serialises access to them.

use crate::{dice_types::BaseRoll, error::InvalidArgument};
use parking_lot::Mutex;
use rand::{distributions::Uniform, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::{
    convert::TryFrom,
    time::{SystemTime, UNIX_EPOCH},
};

#[cfg(feature = "logging")]
use log::debug;

/// Default cap on the number of dice a single roll call may generate.
pub const DEFAULT_MAX_DICE: usize = 10_000;

/// Uniform integer generator for die faces.
pub trait RandomSource: Send {
    /// Returns a value in `[1, sides]`. Callers guarantee `sides >= 1`.
    fn next_die(&mut self, sides: i64) -> i64;
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_die(&mut self, sides: i64) -> i64 {
        self.0.sample(Uniform::new_inclusive(1, sides))
    }
}

/// Replays a fixed list of faces, cycling when exhausted.
///
/// Faces outside `[1, sides]` are wrapped into range so the roller invariants
/// hold even for a careless script.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    faces: Vec<i64>,
    position: usize,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = i64>>(faces: I) -> ScriptedSource {
        ScriptedSource {
            faces: faces.into_iter().collect(),
            position: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn next_die(&mut self, sides: i64) -> i64 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.position % self.faces.len()];
        self.position = self.position.wrapping_add(1);
        (face - 1).rem_euclid(sides) + 1
    }
}

fn time_component() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Thread-safe roller over a single random source.
///
/// The lock is held only while one face is generated, so callers sharing a
/// roller interleave at die granularity.
pub struct BaseRoller {
    source: Mutex<Box<dyn RandomSource>>,
    max_dice: usize,
}

impl BaseRoller {
    pub fn new<S: RandomSource + 'static>(source: S) -> BaseRoller {
        BaseRoller {
            source: Mutex::new(Box::new(source)),
            max_dice: DEFAULT_MAX_DICE,
        }
    }

    /// ChaCha20 seeded from OS entropy, with the stream picked from the clock.
    pub fn from_entropy() -> BaseRoller {
        let mut rng = ChaCha20Rng::from_entropy();
        rng.set_stream(time_component());
        BaseRoller::new(RngSource(rng))
    }

    /// Deterministic roller: equal seeds and call sequences give equal rolls.
    pub fn seeded(seed: u64) -> BaseRoller {
        BaseRoller::new(RngSource(Xoshiro256PlusPlus::seed_from_u64(seed)))
    }

    pub fn seeded_pair(high: u64, low: u64) -> BaseRoller {
        let mut seed: <Xoshiro256PlusPlus as SeedableRng>::Seed = Default::default();
        seed[..8].copy_from_slice(&high.to_le_bytes());
        seed[8..16].copy_from_slice(&low.to_le_bytes());
        seed[16..24].copy_from_slice(&(!high).to_le_bytes());
        seed[24..].copy_from_slice(&(!low).to_le_bytes());
        BaseRoller::new(RngSource(Xoshiro256PlusPlus::from_seed(seed)))
    }

    pub fn with_max_dice(mut self, max_dice: usize) -> BaseRoller {
        self.max_dice = max_dice;
        self
    }

    pub fn max_dice(&self) -> usize {
        self.max_dice
    }

    pub fn roll_one(&self, sides: i64) -> Result<i64, InvalidArgument> {
        check_sides(sides)?;
        Ok(self.next_die(sides))
    }

    /// Rolls `count` dice in generation order. `count` must be at least 1.
    pub fn roll(&self, count: i64, sides: i64) -> Result<BaseRoll, InvalidArgument> {
        check_sides(sides)?;
        if count < 1 {
            return Err(InvalidArgument(format!(
                "dice count must be at least 1, got {}",
                count
            )));
        }
        let count = self.check_count(count)?;
        let rolls: Vec<i64> = (0..count).map(|_| self.next_die(sides)).collect();
        #[cfg(feature = "logging")]
        {
            debug!("rolled {:?} for {}d{}", &rolls, count, sides);
        }
        Ok(BaseRoll { rolls })
    }

    pub(crate) fn check_count(&self, count: i64) -> Result<usize, InvalidArgument> {
        match usize::try_from(count) {
            Ok(count) if count <= self.max_dice => Ok(count),
            Ok(count) => Err(InvalidArgument(format!(
                "{} dice exceed the limit of {}",
                count, self.max_dice
            ))),
            Err(_) => Err(InvalidArgument(format!(
                "dice count must not be negative, got {}",
                count
            ))),
        }
    }

    /// Generates one face without validating `sides`.
    pub(crate) fn next_die(&self, sides: i64) -> i64 {
        self.source.lock().next_die(sides)
    }
}

pub(crate) fn check_sides(sides: i64) -> Result<(), InvalidArgument> {
    if sides < 1 {
        Err(InvalidArgument(format!(
            "a die needs at least 1 side, got {}",
            sides
        )))
    } else {
        Ok(())
    }
}
