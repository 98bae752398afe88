//! Turn sequencing rules.
//!
//! Classifies what a landing means, who moves next, and whether the player
//! ending a turn has won.

use crate::board::{Player, PlayerId, Tile, START_TILE};
use crate::config::GameConfig;

/// What the active player found on the tile they landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// The START tile. Nothing happens.
    Start,
    /// Unowned land that may be claimed.
    Unowned,
    /// The player's own land.
    Own,
    /// Land held by another player.
    Enemy(PlayerId),
}

/// Classifies a landing of `player` on `tile`.
pub fn classify_arrival(tile: &Tile, player: PlayerId) -> Arrival {
    if tile.is_start() {
        return Arrival::Start;
    }
    match tile.owner {
        None => Arrival::Unowned,
        Some(owner) if owner == player => Arrival::Own,
        Some(owner) => Arrival::Enemy(owner),
    }
}

/// The seat after `current` in round-robin order.
pub fn next_player(current: PlayerId, player_count: usize) -> PlayerId {
    PlayerId((current.0 + 1) % player_count.max(1))
}

/// True if `player` meets the victory condition: enough mana while
/// standing on START. Passing START does not count.
pub fn is_winner(player: &Player, config: &GameConfig) -> bool {
    player.mana >= config.win_mana_target && player.position == START_TILE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Controller, TileKind};
    use crate::card::{CardId, CreatureDef, Element};

    fn player_at(position: usize, mana: u32) -> Player {
        Player {
            id: PlayerId(0),
            name: "Player".to_string(),
            color: String::new(),
            mana,
            hand: Vec::new(),
            deck: Vec::new(),
            position,
            laps: 0,
            controller: Controller::Human,
        }
    }

    #[test]
    fn arrival_classification() {
        let start = Tile::new(0, TileKind::Start);
        assert_eq!(classify_arrival(&start, PlayerId(0)), Arrival::Start);

        let mut land = Tile::new(3, TileKind::Land(Element::Water));
        assert_eq!(classify_arrival(&land, PlayerId(0)), Arrival::Unowned);

        land.occupy(
            PlayerId(1),
            CreatureDef::new("Skeleton", Element::Neutral, 20, 20, 10, "").mint(CardId(0)),
        );
        assert_eq!(classify_arrival(&land, PlayerId(1)), Arrival::Own);
        assert_eq!(classify_arrival(&land, PlayerId(0)), Arrival::Enemy(PlayerId(1)));
    }

    #[test]
    fn next_player_is_round_robin() {
        assert_eq!(next_player(PlayerId(0), 2), PlayerId(1));
        assert_eq!(next_player(PlayerId(1), 2), PlayerId(0));
    }

    #[test]
    fn win_requires_target_mana_on_start() {
        let config = GameConfig::default();
        assert!(is_winner(&player_at(0, 2000), &config));
        assert!(is_winner(&player_at(0, 2500), &config));
        assert!(!is_winner(&player_at(5, 2500), &config));
        assert!(!is_winner(&player_at(0, 1999), &config));
    }
}
