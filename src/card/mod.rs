//! Creature cards and decks.

pub mod creature;
pub mod deck;

pub use creature::{CardId, CreatureCard, CreatureDef, Element, ALL_ELEMENTS};
pub use deck::{
    build_deck, fallback_deck, load_creatures, parse_deck_json, DeckError, DeckSource,
    FallbackDeck, JsonDeckSource,
};
