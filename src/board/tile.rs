//! Board tiles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::card::{CreatureCard, Element};

/// Index of the START tile.
pub const START_TILE: usize = 0;

/// Level every tile starts at. No rule raises it yet.
pub const BASE_LEVEL: u8 = 1;

/// What a tile is: the START marker or land of some element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileKind {
    Start,
    Land(Element),
}

impl TileKind {
    /// Returns the land's element, or `None` for START.
    pub const fn element(self) -> Option<Element> {
        match self {
            TileKind::Start => None,
            TileKind::Land(e) => Some(e),
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Start => f.write_str("START"),
            TileKind::Land(e) => write!(f, "{}", e),
        }
    }
}

/// One square of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: usize,
    pub kind: TileKind,
    pub owner: Option<PlayerId>,
    pub creature: Option<CreatureCard>,
    /// 1..=5. Multiplies the toll.
    pub level: u8,
    /// Half the occupant's cost, set when the occupant changes.
    pub base_toll: u32,
}

impl Tile {
    pub fn new(id: usize, kind: TileKind) -> Self {
        Tile {
            id,
            kind,
            owner: None,
            creature: None,
            level: BASE_LEVEL,
            base_toll: 0,
        }
    }

    pub fn is_start(&self) -> bool {
        self.kind == TileKind::Start
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Replaces the owner and occupant together so the two never disagree.
    pub(crate) fn occupy(&mut self, owner: PlayerId, card: CreatureCard) {
        self.base_toll = card.cost / 2;
        self.owner = Some(owner);
        self.creature = Some(card.refreshed());
    }
}
