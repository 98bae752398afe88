//! The game aggregate.
//!
//! `GameState` is the single source of truth for a game: board, players,
//! turn bookkeeping, the pending battle, the narrated log, and the mana
//! history used for charting.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::LogEntry;
use crate::board::{Board, Player, PlayerId, Tile, START_TILE};
use crate::card::CreatureCard;
use crate::config::GameConfig;
use crate::resolve::BattleResult;

/// Phase of the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Held while hands are dealt. A game in this phase accepts no actions.
    Setup,
    Roll,
    Move,
    LandAction,
    Battle,
    GameOver,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Setup => "SETUP",
            Phase::Roll => "ROLL",
            Phase::Move => "MOVE",
            Phase::LandAction => "LAND_ACTION",
            Phase::Battle => "BATTLE",
            Phase::GameOver => "GAME_OVER",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress of a battle.
///
/// Resolution runs from the first strike to the result inside one
/// transition, so a stored battle is always at `End`. The earlier stages
/// name the steps of the narration and appear only in deserialized states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattlePhase {
    Start,
    Attack,
    Counter,
    End,
}

/// A battle awaiting acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    /// The committed card as it entered the battle.
    pub attacker_card: CreatureCard,
    /// The defending occupant as it entered the battle.
    pub defender_card: CreatureCard,
    pub tile: usize,
    pub log: Vec<String>,
    pub phase: BattlePhase,
    pub result: Option<BattleResult>,
}

/// Both players' mana at the end of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaSnapshot {
    pub turn: u32,
    pub player1_mana: u32,
    pub player2_mana: u32,
}

/// A broken game invariant. Never produced by correct use of the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("tile {0} has an occupant but no owner")]
    OccupantWithoutOwner(usize),

    #[error("tile {0} has an owner but no occupant")]
    OwnerWithoutOccupant(usize),

    #[error("the START tile is owned")]
    StartOwned,

    #[error("card {name} has hp {hp} above max {mhp}")]
    HpAboveMax { name: String, hp: u32, mhp: u32 },

    #[error("occupant of tile {0} has no hp left")]
    DeadOccupant(usize),

    #[error("player {0} holds more cards than the hand allows")]
    HandOverflow(PlayerId),

    #[error("player {0} is off the board")]
    OffBoard(PlayerId),
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub theme: String,
    pub board: Board,
    pub players: Vec<Player>,
    /// Whose turn it is.
    pub current: PlayerId,
    /// Shared turn counter, starting at 1.
    pub turn: u32,
    pub phase: Phase,
    /// Rolled but not yet moved.
    pub dice: Option<u8>,
    /// Toll owed on the enemy tile the active player is deciding about.
    pub pending_toll: Option<u32>,
    pub battle: Option<BattleState>,
    pub winner: Option<PlayerId>,
    pub log: Vec<LogEntry>,
    pub mana_history: Vec<ManaSnapshot>,
}

impl GameState {
    pub fn current_player(&self) -> &Player {
        &self.players[self.current.0]
    }

    pub(crate) fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current.0]
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    /// The tile under the active player.
    pub fn current_tile(&self) -> &Tile {
        &self.board.tiles[self.current_player().position]
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Mana of both seats for the chart series.
    pub fn mana_snapshot(&self, turn: u32) -> ManaSnapshot {
        let mana = |i: usize| self.players.get(i).map_or(0, |p| p.mana);
        ManaSnapshot {
            turn,
            player1_mana: mana(0),
            player2_mana: mana(1),
        }
    }

    /// Checks every structural invariant of the game.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for tile in &self.board.tiles {
            match (&tile.owner, &tile.creature) {
                (None, Some(_)) => return Err(InvariantViolation::OccupantWithoutOwner(tile.id)),
                (Some(_), None) => return Err(InvariantViolation::OwnerWithoutOccupant(tile.id)),
                _ => {}
            }
            if tile.id == START_TILE && tile.owner.is_some() {
                return Err(InvariantViolation::StartOwned);
            }
            if let Some(c) = &tile.creature {
                check_hp(c)?;
                if c.hp == 0 {
                    return Err(InvariantViolation::DeadOccupant(tile.id));
                }
            }
        }
        for p in &self.players {
            if p.hand.len() > self.config.max_hand_size {
                return Err(InvariantViolation::HandOverflow(p.id));
            }
            if p.position >= self.board.len() {
                return Err(InvariantViolation::OffBoard(p.id));
            }
            for c in p.hand.iter().chain(p.deck.iter()) {
                check_hp(c)?;
            }
        }
        Ok(())
    }
}

fn check_hp(card: &CreatureCard) -> Result<(), InvariantViolation> {
    if card.hp > card.mhp {
        return Err(InvariantViolation::HpAboveMax {
            name: card.name.clone(),
            hp: card.hp,
            mhp: card.mhp,
        });
    }
    Ok(())
}
