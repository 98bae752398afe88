//! The cyclic board.
//!
//! Holds the fixed tile sequence and the claim, conquest, and healing
//! operations that mutate tile ownership and occupants.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::tile::{Tile, TileKind, START_TILE};
use crate::card::{CreatureCard, Element};

/// Errors from board operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("tile {0} does not exist")]
    NoSuchTile(usize),

    #[error("tile {0} is already owned")]
    TileOwned(usize),

    #[error("the START tile cannot be claimed")]
    StartTile,

    #[error("tile {0} has no occupant")]
    Vacant(usize),
}

/// The ring of tiles, START first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub tiles: Vec<Tile>,
}

impl Board {
    /// Creates `size` tiles: START at index 0, then `pattern` repeated.
    ///
    /// An empty pattern yields neutral land.
    pub fn new(size: usize, pattern: &[Element]) -> Self {
        let mut tiles = Vec::with_capacity(size);
        if size > 0 {
            tiles.push(Tile::new(START_TILE, TileKind::Start));
        }
        for i in 1..size {
            let element = if pattern.is_empty() {
                Element::Neutral
            } else {
                pattern[(i - 1) % pattern.len()]
            };
            tiles.push(Tile::new(i, TileKind::Land(element)));
        }
        Board { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: usize) -> Result<&Tile, BoardError> {
        self.tiles.get(id).ok_or(BoardError::NoSuchTile(id))
    }

    fn tile_mut(&mut self, id: usize) -> Result<&mut Tile, BoardError> {
        self.tiles.get_mut(id).ok_or(BoardError::NoSuchTile(id))
    }

    /// Claims an unowned land tile for `player`, placing a full-health copy
    /// of `card` on it.
    pub fn claim(&mut self, id: usize, player: PlayerId, card: CreatureCard) -> Result<(), BoardError> {
        let tile = self.tile_mut(id)?;
        if tile.is_start() {
            return Err(BoardError::StartTile);
        }
        if tile.owner.is_some() {
            return Err(BoardError::TileOwned(id));
        }
        tile.occupy(player, card);
        Ok(())
    }

    /// Hands an owned tile to `player` with `card` as its new occupant.
    pub fn conquer(&mut self, id: usize, player: PlayerId, card: CreatureCard) -> Result<(), BoardError> {
        let tile = self.tile_mut(id)?;
        if tile.creature.is_none() {
            return Err(BoardError::Vacant(id));
        }
        tile.occupy(player, card);
        Ok(())
    }

    /// Restores a damaged occupant to max hp. Returns true if anything changed.
    pub fn heal_occupant(&mut self, id: usize) -> Result<bool, BoardError> {
        let tile = self.tile_mut(id)?;
        match tile.creature.as_mut() {
            Some(c) if c.is_damaged() => {
                c.heal();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Sets the occupant's hp, capped at its max.
    pub fn set_occupant_hp(&mut self, id: usize, hp: u32) -> Result<(), BoardError> {
        let tile = self.tile_mut(id)?;
        let creature = tile.creature.as_mut().ok_or(BoardError::Vacant(id))?;
        creature.hp = hp.min(creature.mhp);
        Ok(())
    }

    /// Number of tiles owned by `player`.
    pub fn owned_by(&self, player: PlayerId) -> usize {
        self.tiles.iter().filter(|t| t.is_owned_by(player)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardId, CreatureDef};
    use crate::config::default_element_pattern;

    fn golem() -> CreatureCard {
        CreatureDef::new("Magma Golem", Element::Fire, 80, 50, 50, "Heavy hitter.").mint(CardId(1))
    }

    #[test]
    fn board_starts_with_start_tile() {
        let board = Board::new(20, &default_element_pattern());
        assert_eq!(board.len(), 20);
        assert_eq!(board.tiles[0].kind, TileKind::Start);
        for (i, t) in board.tiles.iter().enumerate() {
            assert_eq!(t.id, i);
        }
    }

    #[test]
    fn board_cycles_pattern() {
        let pattern = [Element::Fire, Element::Water, Element::Earth];
        let board = Board::new(8, &pattern);
        let kinds: Vec<TileKind> = board.tiles.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TileKind::Start,
                TileKind::Land(Element::Fire),
                TileKind::Land(Element::Water),
                TileKind::Land(Element::Earth),
                TileKind::Land(Element::Fire),
                TileKind::Land(Element::Water),
                TileKind::Land(Element::Earth),
                TileKind::Land(Element::Fire),
            ]
        );
    }

    #[test]
    fn default_board_tile_kinds() {
        let board = Board::new(20, &default_element_pattern());
        assert_eq!(board.tiles[1].kind, TileKind::Land(Element::Fire));
        assert_eq!(board.tiles[3].kind, TileKind::Land(Element::Water));
        assert_eq!(board.tiles[5].kind, TileKind::Land(Element::Earth));
        assert_eq!(board.tiles[19].kind, TileKind::Land(Element::Neutral));
    }

    #[test]
    fn claim_sets_owner_occupant_and_base_toll() {
        let mut board = Board::new(20, &default_element_pattern());
        board.claim(3, PlayerId(0), golem()).unwrap();
        let t = board.tile(3).unwrap();
        assert_eq!(t.owner, Some(PlayerId(0)));
        assert_eq!(t.creature.as_ref().map(|c| c.name.as_str()), Some("Magma Golem"));
        assert_eq!(t.base_toll, 40);
    }

    #[test]
    fn claim_rejects_owned_tile() {
        let mut board = Board::new(20, &default_element_pattern());
        board.claim(3, PlayerId(0), golem()).unwrap();
        let before = board.clone();
        assert_eq!(board.claim(3, PlayerId(1), golem()), Err(BoardError::TileOwned(3)));
        assert_eq!(board, before);
    }

    #[test]
    fn claim_rejects_start_and_missing_tiles() {
        let mut board = Board::new(20, &default_element_pattern());
        assert_eq!(board.claim(0, PlayerId(0), golem()), Err(BoardError::StartTile));
        assert_eq!(board.claim(20, PlayerId(0), golem()), Err(BoardError::NoSuchTile(20)));
    }

    #[test]
    fn heal_is_idempotent() {
        let mut board = Board::new(20, &default_element_pattern());
        board.claim(2, PlayerId(0), golem()).unwrap();
        board.set_occupant_hp(2, 10).unwrap();
        assert!(board.heal_occupant(2).unwrap());
        assert!(!board.heal_occupant(2).unwrap());
        assert_eq!(board.tile(2).unwrap().creature.as_ref().map(|c| c.hp), Some(50));
        assert!(!board.heal_occupant(5).unwrap());
    }

    #[test]
    fn conquer_requires_occupant() {
        let mut board = Board::new(20, &default_element_pattern());
        assert_eq!(board.conquer(4, PlayerId(1), golem()), Err(BoardError::Vacant(4)));
        board.claim(4, PlayerId(0), golem()).unwrap();
        board.conquer(4, PlayerId(1), golem()).unwrap();
        assert!(board.tile(4).unwrap().is_owned_by(PlayerId(1)));
        assert_eq!(board.owned_by(PlayerId(1)), 1);
        assert_eq!(board.owned_by(PlayerId(0)), 0);
    }
}
