//! Drives a CPU-controlled seat through the phases it does not decide.
//!
//! Land decisions happen inside the state machine when a CPU lands; a
//! driver only has to roll, move, and dismiss battles on its behalf.

use crate::game::{Action, GameState, Phase};

/// The action a driver should submit for the active CPU player, or `None`
/// when the active player is human or nothing is pending.
pub fn next_cpu_action(state: &GameState) -> Option<Action> {
    if state.is_over() || !state.current_player().is_cpu() {
        return None;
    }
    match state.phase {
        Phase::Roll => Some(Action::Roll),
        Phase::Move => Some(Action::Move),
        Phase::Battle => Some(Action::Acknowledge),
        Phase::Setup | Phase::LandAction | Phase::GameOver => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::fallback_deck;
    use crate::config::GameConfig;
    use crate::game::new_game;
    use crate::selfplay::cpu_roster;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn cpu_game() -> GameState {
        let mut rng = SmallRng::seed_from_u64(3);
        new_game(GameConfig::default(), &cpu_roster(), &fallback_deck(), "Test", false, &mut rng)
            .unwrap()
    }

    #[test]
    fn cpu_rolls_and_moves() {
        let mut st = cpu_game();
        assert_eq!(next_cpu_action(&st), Some(Action::Roll));
        st.phase = Phase::Move;
        assert_eq!(next_cpu_action(&st), Some(Action::Move));
        st.phase = Phase::Battle;
        assert_eq!(next_cpu_action(&st), Some(Action::Acknowledge));
    }

    #[test]
    fn nothing_to_do_while_dealing() {
        let mut st = cpu_game();
        st.phase = Phase::Setup;
        assert_eq!(next_cpu_action(&st), None);
    }
}
