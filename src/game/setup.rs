//! Building a fresh game.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::{Event, LogEntry};
use super::state::{GameState, Phase};
use crate::board::{Board, Controller, Player, PlayerId, START_TILE};
use crate::card::{build_deck, load_creatures, CreatureDef, DeckSource};
use crate::config::{ConfigError, GameConfig};

/// Who sits in a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    pub color: String,
    pub controller: Controller,
}

impl PlayerSetup {
    pub fn human(name: &str, color: &str) -> Self {
        PlayerSetup {
            name: name.to_string(),
            color: color.to_string(),
            controller: Controller::Human,
        }
    }

    pub fn cpu(name: &str, color: &str) -> Self {
        PlayerSetup {
            name: name.to_string(),
            color: color.to_string(),
            controller: Controller::Cpu,
        }
    }
}

/// A human player against one CPU rival.
pub fn default_roster() -> [PlayerSetup; 2] {
    [
        PlayerSetup::human("Player", "#3B82F6"),
        PlayerSetup::cpu("Rival AI", "#EF4444"),
    ]
}

/// Deals a new game from `defs`.
///
/// Each seat gets its own shuffled copy of the deck and an opening hand.
/// Player 1 starts, on turn 1, in the roll phase.
pub fn new_game<R: Rng>(
    config: GameConfig,
    roster: &[PlayerSetup; 2],
    defs: &[CreatureDef],
    theme: &str,
    fallback: bool,
    rng: &mut R,
) -> Result<GameState, ConfigError> {
    config.validate()?;

    let board = Board::new(config.board_size, &config.element_pattern);
    let mut next_id = 0u32;
    let players = roster
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            let mut deck = build_deck(defs, &mut next_id, &mut *rng);
            let dealt = config.initial_hand_size.min(deck.len());
            let hand = deck.drain(..dealt).collect();
            Player {
                id: PlayerId(i),
                name: seat.name.clone(),
                color: seat.color.clone(),
                mana: config.starting_mana,
                hand,
                deck,
                position: START_TILE,
                laps: 0,
                controller: seat.controller,
            }
        })
        .collect();

    let mut state = GameState {
        config,
        theme: theme.to_string(),
        board,
        players,
        current: PlayerId(0),
        turn: 1,
        phase: Phase::Setup,
        dice: None,
        pending_toll: None,
        battle: None,
        winner: None,
        log: Vec::new(),
        mana_history: Vec::new(),
    };
    let snapshot = state.mana_snapshot(0);
    state.mana_history.push(snapshot);

    let started = Event::GameStarted {
        theme: theme.to_string(),
        fallback_deck: fallback,
    };
    state.log.push(LogEntry {
        turn: state.turn,
        kind: started.kind(),
        message: started.describe(&state.players),
    });

    state.phase = Phase::Roll;
    log::info!(
        "new game: theme '{}', {} creatures{}, {} tiles",
        theme,
        defs.len(),
        if fallback { " (fallback)" } else { "" },
        state.board.len()
    );
    Ok(state)
}

/// Loads the creature set for `theme` from `source` and deals a game.
/// A failing source falls back to the built-in deck.
pub fn start_game<R: Rng>(
    config: GameConfig,
    roster: &[PlayerSetup; 2],
    source: &dyn DeckSource,
    theme: &str,
    rng: &mut R,
) -> Result<GameState, ConfigError> {
    let (defs, fallback) = load_creatures(source, theme);
    new_game(config, roster, &defs, theme, fallback, rng)
}
