//! Aether engine library.
//!
//! A two-player territory-and-creatures board game: the tile ring and
//! players, creature cards and decks, the rule resolvers, the turn state
//! machine, the CPU policy, and the line protocol and self-play front ends
//! built on them.

pub mod board;
pub mod card;
pub mod config;
pub mod engine;
pub mod game;
pub mod policy;
pub mod protocol;
pub mod resolve;
pub mod selfplay;
