//! Engine-to-client output lines.
//!
//! Every line starts with a keyword so a client can dispatch without
//! parsing the rest:
//!
//! - `event <kind> <message>` one narrated log entry
//! - `card <index> <element> <cost> <st> <hp>/<mhp> <name>` one hand card
//! - `status turn <n> player <id> phase <PHASE> ...` the prompt after a command
//! - `gameover winner <id> turn <n>` the prompt once the game has ended

use crate::board::Player;
use crate::game::{GameState, LogEntry};

pub fn format_log_entry(entry: &LogEntry) -> String {
    format!("event {} {}", entry.kind, entry.message)
}

/// One line per card in `player`'s hand.
pub fn format_hand(player: &Player) -> Vec<String> {
    player
        .hand
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "card {} {} {} {} {}/{} {}",
                i, c.element, c.cost, c.st, c.hp, c.mhp, c.name
            )
        })
        .collect()
}

/// The prompt line describing whose move it is and what is expected.
pub fn format_status(state: &GameState) -> String {
    if let Some(winner) = state.winner {
        return format!("gameover winner {} turn {}", winner, state.turn);
    }
    let player = state.current_player();
    let mana: Vec<String> = state.players.iter().map(|p| p.mana.to_string()).collect();
    let mut line = format!(
        "status turn {} player {} phase {} position {} mana {}",
        state.turn,
        player.id,
        state.phase,
        player.position,
        mana.join(" ")
    );
    if let Some(toll) = state.pending_toll {
        line.push_str(&format!(" toll {}", toll));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::fallback_deck;
    use crate::config::GameConfig;
    use crate::game::{default_roster, new_game, LogKind};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fresh() -> GameState {
        let mut rng = SmallRng::seed_from_u64(3);
        new_game(GameConfig::default(), &default_roster(), &fallback_deck(), "Test", false, &mut rng)
            .unwrap()
    }

    #[test]
    fn log_entry_line() {
        let entry = LogEntry {
            turn: 4,
            kind: LogKind::Economy,
            message: "Player completed a lap! +300 Mana.".to_string(),
        };
        assert_eq!(
            format_log_entry(&entry),
            "event economy Player completed a lap! +300 Mana."
        );
    }

    #[test]
    fn status_of_new_game() {
        let st = fresh();
        assert_eq!(
            format_status(&st),
            "status turn 1 player p1 phase ROLL position 0 mana 500 500"
        );
    }

    #[test]
    fn hand_lines_end_with_name() {
        let st = fresh();
        let lines = format_hand(&st.players[0]);
        assert_eq!(lines.len(), 5);
        for (i, line) in lines.iter().enumerate() {
            let card = &st.players[0].hand[i];
            assert!(line.starts_with(&format!("card {} ", i)));
            assert!(line.ends_with(&card.name));
        }
    }

    #[test]
    fn gameover_line() {
        let mut st = fresh();
        st.winner = Some(st.players[1].id);
        st.turn = 31;
        assert_eq!(format_status(&st), "gameover winner p2 turn 31");
    }
}
