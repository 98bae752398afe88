//! Player actions and the errors that reject them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::Phase;
use crate::board::{BoardError, PlayerId};

/// Something a player asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Roll the die.
    Roll,
    /// Walk the rolled number of tiles and resolve the landing.
    Move,
    /// Claim the unowned tile underfoot with a hand card.
    Summon { hand_index: usize },
    /// Decline to claim the unowned tile underfoot.
    Pass,
    /// Pay the toll on an enemy tile.
    PayToll,
    /// Challenge an enemy tile's occupant with a hand card.
    Fight { hand_index: usize },
    /// Dismiss a resolved battle and finish the turn.
    Acknowledge,
}

impl Action {
    /// Decisions a CPU player makes through its policy, never by request.
    pub const fn is_land_decision(self) -> bool {
        matches!(
            self,
            Action::Summon { .. } | Action::Pass | Action::PayToll | Action::Fight { .. }
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Action::Roll => "roll",
            Action::Move => "move",
            Action::Summon { .. } => "summon",
            Action::Pass => "pass",
            Action::PayToll => "pay",
            Action::Fight { .. } => "fight",
            Action::Acknowledge => "ack",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Summon { hand_index } | Action::Fight { hand_index } => {
                write!(f, "{} {}", self.name(), hand_index)
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Why an action was rejected. The game state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,

    #[error("cannot {action} during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("it is {active}'s turn, not {player}'s")]
    NotYourTurn { player: PlayerId, active: PlayerId },

    #[error("no player {0}")]
    NoSuchPlayer(PlayerId),

    #[error("{0} is CPU-controlled")]
    CpuControlled(PlayerId),

    #[error("no card at hand index {0}")]
    NoSuchCard(usize),

    #[error("not enough mana: need {cost}, have {mana}")]
    InsufficientMana { cost: u32, mana: u32 },

    #[error("cannot fight with an empty hand")]
    EmptyHand,

    #[error("tile {0} is not enemy territory")]
    NotEnemyTile(usize),

    #[error("tile {0} is enemy territory: pay the toll or fight")]
    MustPayOrFight(usize),

    #[error(transparent)]
    Board(#[from] BoardError),
}
