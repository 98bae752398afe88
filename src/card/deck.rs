//! Deck sources and deck construction.
//!
//! A deck source turns a theme string into creature definitions. The
//! content-generation service is external; this crate reads its output
//! schema from JSON and falls back to a fixed ten-card deck whenever a
//! source fails or comes back empty.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use super::creature::{CardId, CreatureCard, CreatureDef, Element};

/// Errors produced by a deck source.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("failed to read deck file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed deck JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deck source returned no cards")]
    Empty,

    #[error("card at index {0} has no name")]
    Unnamed(usize),

    #[error("card '{0}' has zero hp")]
    ZeroHp(String),

    #[error("deck source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies creature definitions for a requested theme.
pub trait DeckSource {
    fn creatures(&self, theme: &str) -> Result<Vec<CreatureDef>, DeckError>;
}

/// The fixed deck used when no other source is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDeck;

impl DeckSource for FallbackDeck {
    fn creatures(&self, _theme: &str) -> Result<Vec<CreatureDef>, DeckError> {
        Ok(fallback_deck())
    }
}

/// Reads creature definitions from a JSON array on disk.
///
/// The file uses the same schema the content service produces:
/// `[{"name", "element", "cost", "st", "hp", "description"}, ...]`.
/// The theme is ignored; the file is the deck.
#[derive(Debug, Clone)]
pub struct JsonDeckSource {
    path: PathBuf,
}

impl JsonDeckSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonDeckSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DeckSource for JsonDeckSource {
    fn creatures(&self, _theme: &str) -> Result<Vec<CreatureDef>, DeckError> {
        let text = fs::read_to_string(&self.path).map_err(|source| DeckError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_deck_json(&text)
    }
}

/// Parses and validates a JSON deck.
pub fn parse_deck_json(text: &str) -> Result<Vec<CreatureDef>, DeckError> {
    let defs: Vec<CreatureDef> = serde_json::from_str(text)?;
    validate(&defs)?;
    Ok(defs)
}

fn validate(defs: &[CreatureDef]) -> Result<(), DeckError> {
    if defs.is_empty() {
        return Err(DeckError::Empty);
    }
    for (i, def) in defs.iter().enumerate() {
        if def.name.trim().is_empty() {
            return Err(DeckError::Unnamed(i));
        }
        if def.hp == 0 {
            return Err(DeckError::ZeroHp(def.name.clone()));
        }
    }
    Ok(())
}

/// Asks `source` for a themed deck, substituting the fallback deck on any
/// failure. Returns the definitions and whether the fallback was used.
pub fn load_creatures(source: &dyn DeckSource, theme: &str) -> (Vec<CreatureDef>, bool) {
    match source.creatures(theme).and_then(|defs| validate(&defs).map(|_| defs)) {
        Ok(defs) => {
            log::debug!("deck source supplied {} cards for theme '{}'", defs.len(), theme);
            (defs, false)
        }
        Err(e) => {
            log::warn!("deck source failed ({}), using fallback deck", e);
            (fallback_deck(), true)
        }
    }
}

/// Mints one physical copy of every definition with fresh ids and shuffles
/// the result. `next_id` is advanced past every id handed out.
pub fn build_deck(defs: &[CreatureDef], next_id: &mut u32, rng: &mut impl Rng) -> Vec<CreatureCard> {
    let mut deck: Vec<CreatureCard> = defs
        .iter()
        .map(|def| {
            let card = def.mint(CardId(*next_id));
            *next_id += 1;
            card
        })
        .collect();
    deck.shuffle(rng);
    deck
}

/// The ten predefined fallback creatures.
pub fn fallback_deck() -> Vec<CreatureDef> {
    vec![
        CreatureDef::new("Flame Wisp", Element::Fire, 30, 20, 20, "A small ball of fire."),
        CreatureDef::new("Goblin Fighter", Element::Earth, 40, 30, 30, "Scrappy fighter."),
        CreatureDef::new("Water Sprite", Element::Water, 30, 10, 40, "Hard to hit."),
        CreatureDef::new("Wind Eagle", Element::Wind, 50, 35, 25, "Strikes from above."),
        CreatureDef::new("Magma Golem", Element::Fire, 80, 50, 50, "Heavy hitter."),
        CreatureDef::new("Ice Wall", Element::Water, 60, 0, 60, "Pure defense."),
        CreatureDef::new("Tree Ent", Element::Earth, 90, 40, 70, "Deep roots."),
        CreatureDef::new("Storm Djinn", Element::Wind, 100, 55, 40, "Master of storms."),
        CreatureDef::new("Skeleton", Element::Neutral, 20, 20, 10, "Weak but cheap."),
        CreatureDef::new("Dragon Hatchling", Element::Fire, 120, 60, 50, "Growing power."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    struct Broken;

    impl DeckSource for Broken {
        fn creatures(&self, _theme: &str) -> Result<Vec<CreatureDef>, DeckError> {
            Err(DeckError::Unavailable("no api key".to_string()))
        }
    }

    struct EmptySource;

    impl DeckSource for EmptySource {
        fn creatures(&self, _theme: &str) -> Result<Vec<CreatureDef>, DeckError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn fallback_deck_has_ten_cards() {
        let deck = fallback_deck();
        assert_eq!(deck.len(), 10);
        assert!(deck.iter().all(|d| d.hp > 0));
    }

    #[test]
    fn failing_source_uses_fallback() {
        let (defs, fallback) = load_creatures(&Broken, "Sushi Warriors");
        assert!(fallback);
        assert_eq!(defs, fallback_deck());
    }

    #[test]
    fn empty_source_uses_fallback() {
        let (defs, fallback) = load_creatures(&EmptySource, "Eldritch Horrors");
        assert!(fallback);
        assert_eq!(defs.len(), 10);
    }

    #[test]
    fn parse_deck_json_accepts_service_schema() {
        let json = r#"[
            {"name": "Neon Drake", "element": "FIRE", "cost": 70, "st": 45, "hp": 35, "description": "Glows."},
            {"name": "Rain Coder", "element": "WATER", "cost": 40, "st": 15, "hp": 45}
        ]"#;
        let defs = parse_deck_json(json).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].element, Element::Fire);
        assert_eq!(defs[1].description, "");
    }

    #[test]
    fn parse_deck_json_rejects_unknown_element() {
        let json = r#"[{"name": "X", "element": "LIGHTNING", "cost": 1, "st": 1, "hp": 1}]"#;
        assert!(matches!(parse_deck_json(json), Err(DeckError::Json(_))));
    }

    #[test]
    fn parse_deck_json_rejects_zero_hp() {
        let json = r#"[{"name": "Ghost", "element": "NEUTRAL", "cost": 1, "st": 1, "hp": 0}]"#;
        assert!(matches!(parse_deck_json(json), Err(DeckError::ZeroHp(_))));
    }

    #[test]
    fn missing_json_file_reports_io_error() {
        let source = JsonDeckSource::new("/nonexistent/deck.json");
        assert!(matches!(source.creatures("any"), Err(DeckError::Io { .. })));
    }

    #[test]
    fn build_deck_assigns_unique_ids() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut next_id = 0;
        let a = build_deck(&fallback_deck(), &mut next_id, &mut rng);
        let b = build_deck(&fallback_deck(), &mut next_id, &mut rng);
        assert_eq!(next_id, 20);
        let ids: HashSet<CardId> = a.iter().chain(b.iter()).map(|c| c.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn build_deck_is_reproducible_for_a_seed() {
        let mut n1 = 0;
        let mut n2 = 0;
        let a = build_deck(&fallback_deck(), &mut n1, &mut SmallRng::seed_from_u64(9));
        let b = build_deck(&fallback_deck(), &mut n2, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
