//! Events emitted by state transitions.
//!
//! Every transition returns the events it produced, in order. Each event is
//! also narrated into the game's append-only log so a presentation layer
//! can pace and display them however it likes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Player, PlayerId};
use crate::resolve::BattleResult;

/// Log category used by presentation for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Combat,
    Economy,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogKind::Info => "info",
            LogKind::Combat => "combat",
            LogKind::Economy => "economy",
        })
    }
}

/// One narrated line in the game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub kind: LogKind,
    pub message: String,
}

/// Something that happened during a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    GameStarted {
        theme: String,
        fallback_deck: bool,
    },
    Rolled {
        player: PlayerId,
        value: u8,
    },
    LapCompleted {
        player: PlayerId,
        bonus: u32,
    },
    Moved {
        player: PlayerId,
        from: usize,
        to: usize,
    },
    Summoned {
        player: PlayerId,
        card: String,
        tile: usize,
        cost: u32,
    },
    Declined {
        player: PlayerId,
    },
    Healed {
        player: PlayerId,
        tile: usize,
        creature: String,
    },
    TollDue {
        payer: PlayerId,
        owner: PlayerId,
        amount: u32,
    },
    TollPaid {
        payer: PlayerId,
        owner: PlayerId,
        owed: u32,
        paid: u32,
        bankrupt: bool,
    },
    BattleStarted {
        attacker: PlayerId,
        defender: PlayerId,
        tile: usize,
        attacker_card: String,
        defender_card: String,
    },
    BattleNarration {
        line: String,
    },
    BattleEnded {
        attacker: PlayerId,
        tile: usize,
        result: BattleResult,
    },
    CardDrawn {
        player: PlayerId,
    },
    TurnStarted {
        player: PlayerId,
        turn: u32,
    },
    GameWon {
        player: PlayerId,
        mana: u32,
    },
}

impl Event {
    /// The log category of this event.
    pub fn kind(&self) -> LogKind {
        match self {
            Event::LapCompleted { .. } | Event::Summoned { .. } | Event::TollPaid { .. } => {
                LogKind::Economy
            }
            Event::TollDue { .. }
            | Event::BattleStarted { .. }
            | Event::BattleNarration { .. }
            | Event::BattleEnded { .. } => LogKind::Combat,
            _ => LogKind::Info,
        }
    }

    /// Renders the event as a log line, naming players from `players`.
    pub fn describe(&self, players: &[Player]) -> String {
        let name = |id: &PlayerId| {
            players
                .get(id.0)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        match self {
            Event::GameStarted { theme, fallback_deck } => {
                if *fallback_deck {
                    format!("Game started! Theme: {} (fallback deck).", theme)
                } else {
                    format!("Game started! Theme: {}.", theme)
                }
            }
            Event::Rolled { player, value } => format!("{} rolled a {}.", name(player), value),
            Event::LapCompleted { player, bonus } => {
                format!("{} completed a lap! +{} Mana.", name(player), bonus)
            }
            Event::Moved { player, to, .. } => format!("{} moved to Tile {}.", name(player), to),
            Event::Summoned { player, card, tile, .. } => {
                format!("{} summoned {} on Tile {}.", name(player), card, tile)
            }
            Event::Declined { player } => format!("{} decided not to summon.", name(player)),
            Event::Healed { creature, .. } => format!("{} rests and recovers HP.", creature),
            Event::TollDue { owner, amount, .. } => {
                format!("Landed on {}'s territory! Toll is {}.", name(owner), amount)
            }
            Event::TollPaid { payer, owner, paid, bankrupt, .. } => {
                if *bankrupt {
                    format!(
                        "{} is bankrupt! Transferred remaining {} Mana to {}.",
                        name(payer),
                        paid,
                        name(owner)
                    )
                } else {
                    format!("{} paid {} Mana toll to {}.", name(payer), paid, name(owner))
                }
            }
            Event::BattleStarted { tile, attacker_card, defender_card, .. } => format!(
                "Battle started at Tile {}! {} challenges {}.",
                tile, attacker_card, defender_card
            ),
            Event::BattleNarration { line } => line.clone(),
            Event::BattleEnded { attacker, result, .. } => match result {
                BattleResult::Win => format!("{} claims the land!", name(attacker)),
                BattleResult::Loss => format!("{}'s attack failed.", name(attacker)),
                BattleResult::Draw => format!("{}'s attack was repelled.", name(attacker)),
            },
            Event::CardDrawn { player } => format!("{} drew a card.", name(player)),
            Event::TurnStarted { player, turn } => format!("Turn {}: {} to roll.", turn, name(player)),
            Event::GameWon { player, mana } => {
                format!("{} wins with {} Mana!", name(player), mana)
            }
        }
    }
}
