//! Injectable randomness for the turn loop.
//!
//! The state machine never touches a global RNG. Dice and the CPU's coin
//! flip come through `Randomness`, so a harness can replay a seed or script
//! exact rolls.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::DIE_FACES;

/// Source of dice rolls and coin flips.
pub trait Randomness {
    /// A uniform value in `1..=6`.
    fn roll_die(&mut self) -> u8;
    /// A fair coin.
    fn coin_flip(&mut self) -> bool;
}

impl Randomness for SmallRng {
    fn roll_die(&mut self) -> u8 {
        self.gen_range(1..=DIE_FACES)
    }

    fn coin_flip(&mut self) -> bool {
        self.gen_bool(0.5)
    }
}

/// Plays back fixed rolls and flips, then falls back to a seeded RNG.
#[derive(Debug, Clone)]
pub struct ScriptedRandomness {
    rolls: VecDeque<u8>,
    flips: VecDeque<bool>,
    fallback: SmallRng,
}

impl ScriptedRandomness {
    /// Rolls outside `1..=6` are clamped into range.
    pub fn new(rolls: impl IntoIterator<Item = u8>, flips: impl IntoIterator<Item = bool>) -> Self {
        ScriptedRandomness {
            rolls: rolls.into_iter().map(|r| r.clamp(1, DIE_FACES)).collect(),
            flips: flips.into_iter().collect(),
            fallback: SmallRng::seed_from_u64(0),
        }
    }

    /// Only dice are scripted; every coin flip comes from the fallback.
    pub fn rolls(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self::new(rolls, std::iter::empty())
    }

    /// Scripted values not yet consumed.
    pub fn remaining(&self) -> (usize, usize) {
        (self.rolls.len(), self.flips.len())
    }
}

impl Randomness for ScriptedRandomness {
    fn roll_die(&mut self) -> u8 {
        match self.rolls.pop_front() {
            Some(r) => r,
            None => self.fallback.roll_die(),
        }
    }

    fn coin_flip(&mut self) -> bool {
        match self.flips.pop_front() {
            Some(f) => f,
            None => self.fallback.coin_flip(),
        }
    }
}
