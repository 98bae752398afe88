//! CPU opponent.
//!
//! A handful of fixed heuristics rather than a search: summon the priciest
//! affordable card, fight expensive tolls (or on a coin flip), and attack
//! with the strongest card.

pub mod autoplay;
pub mod heuristic;

pub use autoplay::next_cpu_action;
pub use heuristic::{choose_attacker, choose_summon, fight_or_pay, TollChoice};
