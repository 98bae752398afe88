//! Fixed CPU heuristics.
//!
//! Three independent decisions: which card to summon on free land, whether
//! to fight or pay on enemy land, and which card to fight with. Ties always
//! go to the card earliest in the hand.

use crate::card::CreatureCard;
use crate::game::Randomness;

/// The CPU's answer to a toll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TollChoice {
    Fight,
    Pay,
}

/// Index of the first card maximising `key` among cards passing `keep`.
fn first_max_by<K, F>(hand: &[CreatureCard], keep: F, key: K) -> Option<usize>
where
    K: Fn(&CreatureCard) -> u32,
    F: Fn(&CreatureCard) -> bool,
{
    let mut best: Option<(usize, u32)> = None;
    for (i, card) in hand.iter().enumerate() {
        if !keep(card) {
            continue;
        }
        let k = key(card);
        match best {
            Some((_, b)) if b >= k => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Picks the most expensive card the CPU can afford, or `None` to decline.
pub fn choose_summon(hand: &[CreatureCard], mana: u32) -> Option<usize> {
    first_max_by(hand, |c| c.cost <= mana, |c| c.cost)
}

/// Fights whenever the toll exceeds `threshold`; otherwise a coin flip
/// decides. The coin is only flipped when the threshold does not already
/// settle the question.
pub fn fight_or_pay<R: Randomness + ?Sized>(toll: u32, threshold: u32, rnd: &mut R) -> TollChoice {
    if toll > threshold || rnd.coin_flip() {
        TollChoice::Fight
    } else {
        TollChoice::Pay
    }
}

/// Picks the strongest card to attack with.
pub fn choose_attacker(hand: &[CreatureCard]) -> Option<usize> {
    first_max_by(hand, |_| true, |c| c.st)
}
