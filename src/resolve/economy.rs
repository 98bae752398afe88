//! Mana economy: tolls, bankruptcy, movement wrap, and lap bonuses.

use crate::board::{Player, Tile};

/// Result of moving a token around the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub from: usize,
    pub to: usize,
    /// True if the move passed the last tile and came back around.
    pub wrapped: bool,
}

/// Moves `steps` tiles forward from `from` on a ring of `board_size` tiles.
///
/// At most one wrap is reported. Dice never exceed the board length (the
/// configuration rejects boards of six tiles or fewer), so a single move
/// cannot wrap twice.
pub fn advance_position(from: usize, steps: usize, board_size: usize) -> Movement {
    let raw = from + steps;
    Movement {
        from,
        to: raw % board_size,
        wrapped: raw >= board_size,
    }
}

/// Toll owed for landing on `tile`: `floor(cost * level / 1.5)`, or 0 when
/// nothing occupies it. Saturates at `u32::MAX`.
pub fn compute_toll(tile: &Tile) -> u32 {
    match &tile.creature {
        Some(c) => {
            let toll = u64::from(c.cost) * u64::from(tile.level) * 2 / 3;
            u32::try_from(toll).unwrap_or(u32::MAX)
        }
        None => 0,
    }
}

/// Outcome of a toll transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TollPayment {
    /// Toll that was owed.
    pub owed: u32,
    /// Mana that actually moved.
    pub paid: u32,
    /// True if the payer could not cover the toll.
    pub bankrupt: bool,
}

/// Moves toll mana from `payer` to `owner`.
///
/// A payer short of the full amount hands over everything they have and is
/// left at zero. Nothing else is seized.
pub fn apply_toll(payer: &mut Player, owner: &mut Player, amount: u32) -> TollPayment {
    let paid = amount.min(payer.mana);
    payer.mana -= paid;
    owner.mana = owner.mana.saturating_add(paid);
    TollPayment {
        owed: amount,
        paid,
        bankrupt: paid < amount,
    }
}

/// Credits one completed lap.
pub fn apply_lap_bonus(player: &mut Player, bonus: u32) {
    player.laps += 1;
    player.mana = player.mana.saturating_add(bonus);
}
