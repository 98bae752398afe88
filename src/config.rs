//! Tunable game parameters.
//!
//! Every rule constant lives here rather than in the rules code so a
//! harness or the line protocol can change it before a game starts.

use serde::{Deserialize, Serialize};

use crate::card::Element;

/// Highest face on the movement die.
pub const DIE_FACES: u8 = 6;

/// Errors raised when a configuration is invalid or an option cannot be set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board size {0} must be larger than the die ({die})", die = DIE_FACES)]
    BoardTooSmall(usize),

    #[error("element pattern must not be empty")]
    EmptyPattern,

    #[error("max hand size must be at least 1")]
    ZeroHandSize,

    #[error("initial hand size {initial} exceeds max hand size {max}")]
    InitialHandTooLarge { initial: usize, max: usize },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// The rule constants of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of tiles, START included.
    pub board_size: usize,
    /// Mana each player starts with.
    pub starting_mana: u32,
    /// Hand capacity; draws are skipped when the hand is full.
    pub max_hand_size: usize,
    /// Cards dealt to each hand at setup.
    pub initial_hand_size: usize,
    /// Mana credited for each completed lap.
    pub lap_bonus: u32,
    /// Mana needed to win while standing on START.
    pub win_mana_target: u32,
    /// Strength added to a defender standing on its own element.
    pub terrain_bonus: u32,
    /// Tolls above this always make the CPU fight.
    pub cpu_fight_toll_threshold: u32,
    /// Element sequence repeated over tiles 1.. of the board.
    pub element_pattern: Vec<Element>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: 20,
            starting_mana: 500,
            max_hand_size: 6,
            initial_hand_size: 5,
            lap_bonus: 300,
            win_mana_target: 2000,
            terrain_bonus: 10,
            cpu_fight_toll_threshold: 100,
            element_pattern: default_element_pattern(),
        }
    }
}

/// The board's standard element sequence.
pub fn default_element_pattern() -> Vec<Element> {
    use Element::*;
    vec![
        Fire, Fire, Water, Water, Earth, Earth, Wind, Wind, Neutral, Fire, Water, Earth, Wind,
        Neutral, Fire, Water, Earth, Wind, Neutral,
    ]
}

impl GameConfig {
    /// Checks that the configuration can run a game.
    ///
    /// The board must be longer than the largest die face so a single move
    /// can never wrap past START more than once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size <= DIE_FACES as usize {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        if self.element_pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        if self.max_hand_size == 0 {
            return Err(ConfigError::ZeroHandSize);
        }
        if self.initial_hand_size > self.max_hand_size {
            return Err(ConfigError::InitialHandTooLarge {
                initial: self.initial_hand_size,
                max: self.max_hand_size,
            });
        }
        Ok(())
    }

    /// Sets one option by its protocol name.
    ///
    /// Names are matched case-insensitively. The pattern option takes a
    /// comma-separated list of element names.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "boardsize" => self.board_size = value.parse().map_err(|_| invalid())?,
            "startingmana" => self.starting_mana = value.parse().map_err(|_| invalid())?,
            "maxhandsize" => self.max_hand_size = value.parse().map_err(|_| invalid())?,
            "initialhandsize" => self.initial_hand_size = value.parse().map_err(|_| invalid())?,
            "lapbonus" => self.lap_bonus = value.parse().map_err(|_| invalid())?,
            "winmanatarget" => self.win_mana_target = value.parse().map_err(|_| invalid())?,
            "terrainbonus" => self.terrain_bonus = value.parse().map_err(|_| invalid())?,
            "cpufightthreshold" => {
                self.cpu_fight_toll_threshold = value.parse().map_err(|_| invalid())?
            }
            "elementpattern" => {
                let pattern = value
                    .split(',')
                    .map(|s| Element::from_name(s.trim()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?;
                self.element_pattern = pattern;
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}
