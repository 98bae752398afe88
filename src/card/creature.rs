//! Creature cards and their elements.
//!
//! A `CreatureDef` is the stat block supplied by a deck source. A
//! `CreatureCard` is one physical copy of a definition with its own id and
//! current hit points.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The elemental affinity of a creature or a land tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Wind,
    Neutral,
}

/// All elements in canonical order.
pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Fire,
    Element::Water,
    Element::Earth,
    Element::Wind,
    Element::Neutral,
];

impl Element {
    /// Returns the uppercase name used by deck sources.
    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "FIRE",
            Element::Water => "WATER",
            Element::Earth => "EARTH",
            Element::Wind => "WIND",
            Element::Neutral => "NEUTRAL",
        }
    }

    /// Parses an element name, ignoring case.
    pub fn from_name(s: &str) -> Option<Element> {
        ALL_ELEMENTS
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one physical copy of a creature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

/// A creature definition as supplied by a deck source.
///
/// Max hp is not part of the definition; it is taken from `hp` when a copy
/// is minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureDef {
    pub name: String,
    pub element: Element,
    pub cost: u32,
    pub st: u32,
    pub hp: u32,
    #[serde(default)]
    pub description: String,
}

impl CreatureDef {
    /// Convenience constructor used by the fallback deck and tests.
    pub fn new(name: &str, element: Element, cost: u32, st: u32, hp: u32, description: &str) -> Self {
        CreatureDef {
            name: name.to_string(),
            element,
            cost,
            st,
            hp,
            description: description.to_string(),
        }
    }

    /// Mints a physical copy at full health.
    pub fn mint(&self, id: CardId) -> CreatureCard {
        CreatureCard {
            id,
            name: self.name.clone(),
            element: self.element,
            cost: self.cost,
            st: self.st,
            hp: self.hp,
            mhp: self.hp,
            description: self.description.clone(),
        }
    }
}

/// A creature card in play: in a hand, a deck, or occupying a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureCard {
    pub id: CardId,
    pub name: String,
    pub element: Element,
    pub cost: u32,
    pub st: u32,
    pub hp: u32,
    pub mhp: u32,
    pub description: String,
}

impl CreatureCard {
    /// Returns true if the creature has lost any hit points.
    pub fn is_damaged(&self) -> bool {
        self.hp < self.mhp
    }

    /// Returns a copy of this card restored to max hp.
    pub fn refreshed(&self) -> CreatureCard {
        CreatureCard {
            hp: self.mhp,
            ..self.clone()
        }
    }

    /// Restores hp to max.
    pub fn heal(&mut self) {
        self.hp = self.mhp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_name_roundtrip() {
        for e in ALL_ELEMENTS {
            assert_eq!(Element::from_name(e.name()), Some(e));
        }
        assert_eq!(Element::from_name("water"), Some(Element::Water));
        assert_eq!(Element::from_name("LIGHTNING"), None);
    }

    #[test]
    fn element_serde_uses_uppercase_names() {
        let json = serde_json::to_string(&Element::Wind).unwrap();
        assert_eq!(json, "\"WIND\"");
        let parsed: Element = serde_json::from_str("\"EARTH\"").unwrap();
        assert_eq!(parsed, Element::Earth);
    }

    #[test]
    fn mint_sets_max_hp_from_hp() {
        let def = CreatureDef::new("Tree Ent", Element::Earth, 90, 40, 70, "Deep roots.");
        let card = def.mint(CardId(7));
        assert_eq!(card.id, CardId(7));
        assert_eq!(card.hp, 70);
        assert_eq!(card.mhp, 70);
        assert!(!card.is_damaged());
    }

    #[test]
    fn heal_and_refresh_restore_max_hp() {
        let mut card = CreatureDef::new("Ice Wall", Element::Water, 60, 0, 60, "").mint(CardId(1));
        card.hp = 12;
        assert!(card.is_damaged());
        assert_eq!(card.refreshed().hp, 60);
        assert_eq!(card.hp, 12);
        card.heal();
        assert_eq!(card.hp, 60);
    }
}
