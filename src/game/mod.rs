//! The game: state, actions, events, and the turn state machine.

pub mod action;
pub mod event;
pub mod machine;
pub mod random;
pub mod setup;
pub mod state;

pub use action::{Action, GameError};
pub use event::{Event, LogEntry, LogKind};
pub use machine::step;
pub use random::{Randomness, ScriptedRandomness};
pub use setup::{default_roster, new_game, start_game, PlayerSetup};
pub use state::{BattlePhase, BattleState, GameState, InvariantViolation, ManaSnapshot, Phase};
