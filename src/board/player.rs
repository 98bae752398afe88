//! Players, their hands, and their draw piles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::CreatureCard;

/// Stable player identity. Doubles as the player's seat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0 + 1)
    }
}

/// Who makes a player's decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Human,
    Cpu,
}

/// A participant in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Presentation only.
    pub color: String,
    pub mana: u32,
    pub hand: Vec<CreatureCard>,
    pub deck: Vec<CreatureCard>,
    pub position: usize,
    pub laps: u32,
    pub controller: Controller,
}

impl Player {
    pub fn is_cpu(&self) -> bool {
        self.controller == Controller::Cpu
    }

    /// Removes and returns the hand card at `index`.
    pub fn take_card(&mut self, index: usize) -> Option<CreatureCard> {
        if index < self.hand.len() {
            Some(self.hand.remove(index))
        } else {
            None
        }
    }

    /// Moves the top of the deck into the hand if the hand has room.
    /// Returns the drawn card.
    pub fn draw(&mut self, max_hand_size: usize) -> Option<&CreatureCard> {
        if self.hand.len() >= max_hand_size || self.deck.is_empty() {
            return None;
        }
        let card = self.deck.remove(0);
        self.hand.push(card);
        self.hand.last()
    }
}
