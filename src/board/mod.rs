//! Board representation.
//!
//! Contains the tile ring, tiles, and players.

pub mod player;
pub mod state;
pub mod tile;

pub use player::{Controller, Player, PlayerId};
pub use state::{Board, BoardError};
pub use tile::{Tile, TileKind, BASE_LEVEL, START_TILE};
