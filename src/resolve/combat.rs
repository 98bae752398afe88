//! Two-round battle resolution.
//!
//! The attacker strikes once. If the defender survives it strikes back,
//! with a bonus when it fights on land of its own element. There is never
//! a third strike. Resolution is pure: the caller applies the outcome.

use serde::{Deserialize, Serialize};

use crate::board::TileKind;
use crate::card::CreatureCard;

/// How a battle ended, from the attacker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleResult {
    /// Defender destroyed; the attacker takes the tile.
    Win,
    /// Attacker destroyed by the counter.
    Loss,
    /// Both survived; the attacking card is spent anyway.
    Draw,
}

/// Everything the orchestrator needs to apply a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub result: BattleResult,
    /// Defender hp after the first strike, floored at 0.
    pub defender_hp: u32,
    /// Attacker hp after the counter. `None` when no counter happened.
    pub attacker_hp: Option<u32>,
    /// Strength of the counter including any terrain bonus.
    pub counter_strength: Option<u32>,
    /// The tile's occupant once the battle is over: the attacker at full
    /// health on a win, otherwise the wounded defender.
    pub occupant: CreatureCard,
    /// Narration of each strike.
    pub log: Vec<String>,
}

/// Strength the defender counters with on `terrain`.
pub fn counter_strength(defender: &CreatureCard, terrain: TileKind, terrain_bonus: u32) -> u32 {
    if terrain.element() == Some(defender.element) {
        defender.st.saturating_add(terrain_bonus)
    } else {
        defender.st
    }
}

/// Resolves a battle between `attacker` and the tile's `defender`.
pub fn resolve_battle(
    attacker: &CreatureCard,
    defender: &CreatureCard,
    terrain: TileKind,
    terrain_bonus: u32,
) -> BattleOutcome {
    let mut log = vec![
        format!("{} prepares to strike {}!", attacker.name, defender.name),
        format!("{} attacks for {} damage!", attacker.name, attacker.st),
    ];

    let defender_hp = defender.hp.saturating_sub(attacker.st);
    if defender_hp == 0 {
        log.push(format!("{} was destroyed!", defender.name));
        return BattleOutcome {
            result: BattleResult::Win,
            defender_hp,
            attacker_hp: None,
            counter_strength: None,
            occupant: attacker.refreshed(),
            log,
        };
    }

    log.push(format!("{} survives and counters!", defender.name));
    let strength = counter_strength(defender, terrain, terrain_bonus);
    if strength > defender.st {
        log.push(format!(
            "{} draws on the {} terrain (+{})!",
            defender.name,
            terrain,
            strength - defender.st
        ));
    }
    log.push(format!("{} deals {} damage!", defender.name, strength));

    let attacker_hp = attacker.hp.saturating_sub(strength);
    let result = if attacker_hp == 0 {
        log.push(format!("{} was destroyed! Attack failed.", attacker.name));
        BattleResult::Loss
    } else {
        log.push("Both creatures survived. Attack repelled.".to_string());
        BattleResult::Draw
    };

    let mut occupant = defender.clone();
    occupant.hp = defender_hp;
    BattleOutcome {
        result,
        defender_hp,
        attacker_hp: Some(attacker_hp),
        counter_strength: Some(strength),
        occupant,
        log,
    }
}
