//! Rule resolution.
//!
//! Toll and lap economics, two-round combat, and turn sequencing. Every
//! function here is free of randomness.

pub mod combat;
pub mod economy;
pub mod phase;

pub use combat::{counter_strength, resolve_battle, BattleOutcome, BattleResult};
pub use economy::{
    advance_position, apply_lap_bonus, apply_toll, compute_toll, Movement, TollPayment,
};
pub use phase::{classify_arrival, is_winner, next_player, Arrival};
