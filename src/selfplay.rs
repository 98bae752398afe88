//! CPU-vs-CPU self-play.
//!
//! Plays full games with both seats on the CPU policy, seeded per game so
//! any record can be replayed, and records the outcome, mana series, and
//! battle tallies of each game for balance analysis.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::board::PlayerId;
use crate::card::{load_creatures, CreatureDef, DeckSource, FallbackDeck, JsonDeckSource};
use crate::config::{ConfigError, GameConfig};
use crate::game::{new_game, Event, GameError, InvariantViolation, ManaSnapshot, PlayerSetup};
use crate::policy::next_cpu_action;
use crate::resolve::BattleResult;

/// Configuration for self-play runs.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Games still running after this many turns are recorded unfinished.
    pub max_turns: u32,
    /// Number of parallel threads.
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`. 0 draws seeds from entropy.
    pub seed: u64,
    /// Optional JSON deck file; the fallback deck otherwise.
    pub deck: Option<PathBuf>,
    /// Re-check every invariant after every transition.
    pub check_invariants: bool,
    /// Suppress per-game progress logging.
    pub quiet: bool,
    /// Rules for every game.
    pub game: GameConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: 500,
            threads: 4,
            seed: 0,
            deck: None,
            check_invariants: false,
            quiet: false,
            game: GameConfig::default(),
        }
    }
}

/// Why a self-play run stopped.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("game {game_id}: {source}")]
    Game { game_id: usize, source: GameError },

    #[error("game {game_id}, turn {turn}: {source}")]
    Invariant {
        game_id: usize,
        turn: u32,
        source: InvariantViolation,
    },

    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Battle outcomes of one game, from the attackers' point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BattleTally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl BattleTally {
    fn record(&mut self, result: BattleResult) {
        match result {
            BattleResult::Win => self.wins += 1,
            BattleResult::Loss => self.losses += 1,
            BattleResult::Draw => self.draws += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    /// Seed that replays this game.
    pub seed: u64,
    /// True when the deck file failed and the built-in deck was dealt.
    pub fallback_deck: bool,
    pub winner: Option<PlayerId>,
    /// Turn counter when the game ended or was cut off.
    pub turns: u32,
    pub final_mana: Vec<u32>,
    pub tiles_owned: Vec<usize>,
    pub laps: Vec<u32>,
    pub battles: BattleTally,
    pub mana_history: Vec<ManaSnapshot>,
}

/// Both seats on the CPU policy.
pub fn cpu_roster() -> [PlayerSetup; 2] {
    [
        PlayerSetup::cpu("Player", "#3B82F6"),
        PlayerSetup::cpu("Rival AI", "#EF4444"),
    ]
}

/// Seed for game `game_id` of a run.
fn game_seed(config: &SelfPlayConfig, game_id: usize) -> u64 {
    if config.seed != 0 {
        config.seed.wrapping_add(game_id as u64)
    } else {
        rand::random()
    }
}

/// Plays one game from `seed` to a win or the turn cap. `fallback` marks
/// `defs` as the built-in deck standing in for a failed deck file.
pub fn play_game(
    config: &SelfPlayConfig,
    defs: &[CreatureDef],
    fallback: bool,
    game_id: usize,
    seed: u64,
) -> Result<GameRecord, SelfPlayError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = new_game(
        config.game.clone(),
        &cpu_roster(),
        defs,
        "Self-play",
        fallback,
        &mut rng,
    )?;
    let mut battles = BattleTally::default();

    while !state.is_over() && state.turn <= config.max_turns {
        let Some(action) = next_cpu_action(&state) else {
            break;
        };
        let id = state.current;
        let events = state
            .apply(id, action, &mut rng)
            .map_err(|source| SelfPlayError::Game { game_id, source })?;
        for event in &events {
            if let Event::BattleEnded { result, .. } = event {
                battles.record(*result);
            }
        }
        if config.check_invariants {
            state
                .check_invariants()
                .map_err(|source| SelfPlayError::Invariant {
                    game_id,
                    turn: state.turn,
                    source,
                })?;
        }
    }

    Ok(GameRecord {
        game_id,
        seed,
        fallback_deck: fallback,
        winner: state.winner,
        turns: state.turn,
        final_mana: state.players.iter().map(|p| p.mana).collect(),
        tiles_owned: state.players.iter().map(|p| state.board.owned_by(p.id)).collect(),
        laps: state.players.iter().map(|p| p.laps).collect(),
        battles,
        mana_history: state.mana_history,
    })
}

fn log_game(config: &SelfPlayConfig, record: &GameRecord, started: Instant) {
    if config.quiet {
        return;
    }
    let outcome = match record.winner {
        Some(w) => format!("{} wins", w),
        None => "unfinished".to_string(),
    };
    log::info!(
        "game {}/{}: {} after {} turns ({:.1}ms)",
        record.game_id + 1,
        config.num_games,
        outcome,
        record.turns,
        started.elapsed().as_secs_f64() * 1000.0
    );
}

/// Plays `config.num_games` games, in parallel when `config.threads > 1`.
/// Records come back ordered by game id.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let source: Box<dyn DeckSource> = match &config.deck {
        Some(path) => Box::new(JsonDeckSource::new(path)),
        None => Box::new(FallbackDeck),
    };
    let (defs, fallback) = load_creatures(source.as_ref(), "Self-play");

    let play = |game_id: usize| -> Result<GameRecord, SelfPlayError> {
        let started = Instant::now();
        let record = play_game(config, &defs, fallback, game_id, game_seed(config, game_id))?;
        log_game(config, &record, started);
        Ok(record)
    };

    if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| (0..config.num_games).into_par_iter().map(play).collect())
    } else {
        (0..config.num_games).map(play).collect()
    }
}

/// Writes one JSON object per game.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate statistics over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    /// Wins per seat.
    pub wins: Vec<usize>,
    pub unfinished: usize,
    pub average_turns: f64,
    pub battles: BattleTally,
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut summary = Summary {
        games: games.len(),
        wins: vec![0; 2],
        ..Summary::default()
    };
    let mut total_turns = 0u64;
    for game in games {
        total_turns += u64::from(game.turns);
        match game.winner {
            Some(w) => {
                if summary.wins.len() <= w.0 {
                    summary.wins.resize(w.0 + 1, 0);
                }
                summary.wins[w.0] += 1;
            }
            None => summary.unfinished += 1,
        }
        summary.battles.wins += game.battles.wins;
        summary.battles.losses += game.battles.losses;
        summary.battles.draws += game.battles.draws;
    }
    if !games.is_empty() {
        summary.average_turns = total_turns as f64 / games.len() as f64;
    }
    summary
}

/// Logs a run summary.
pub fn log_summary(games: &[GameRecord]) {
    let s = summarize(games);
    log::info!("=== Self-play summary ===");
    log::info!("games: {}, unfinished: {}", s.games, s.unfinished);
    for (seat, wins) in s.wins.iter().enumerate() {
        let pct = if s.games > 0 {
            *wins as f64 / s.games as f64 * 100.0
        } else {
            0.0
        };
        log::info!("  {}: {} wins ({:.1}%)", PlayerId(seat), wins, pct);
    }
    log::info!("average length: {:.1} turns", s.average_turns);
    log::info!(
        "battles: {} ({} won, {} lost, {} drawn)",
        s.battles.total(),
        s.battles.wins,
        s.battles.losses,
        s.battles.draws
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::fallback_deck;

    fn quiet(num_games: usize, seed: u64) -> SelfPlayConfig {
        SelfPlayConfig {
            num_games,
            seed,
            threads: 1,
            quiet: true,
            check_invariants: true,
            ..SelfPlayConfig::default()
        }
    }

    #[test]
    fn seeded_games_replay_exactly() {
        let config = quiet(1, 77);
        let a = play_game(&config, &fallback_deck(), false, 0, 77).unwrap();
        let b = play_game(&config, &fallback_deck(), false, 0, 77).unwrap();
        assert_eq!(a.turns, b.turns);
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.mana_history, b.mana_history);
    }

    #[test]
    fn mana_history_has_one_entry_per_finished_turn() {
        let config = quiet(1, 3);
        let record = play_game(&config, &fallback_deck(), false, 0, 3).unwrap();
        // The turn 0 snapshot plus one per completed turn; a winning turn
        // adds none.
        assert_eq!(record.mana_history.len(), record.turns as usize);
        assert_eq!(record.mana_history[0].turn, 0);
    }

    #[test]
    fn turn_cap_stops_long_games() {
        let config = SelfPlayConfig {
            max_turns: 5,
            ..quiet(1, 11)
        };
        let record = play_game(&config, &fallback_deck(), false, 0, 11).unwrap();
        assert_eq!(record.winner, None);
        assert_eq!(record.turns, 6);
    }

    #[test]
    fn parallel_matches_sequential() {
        let sequential = run_self_play(&quiet(4, 5)).unwrap();
        let parallel = run_self_play(&SelfPlayConfig {
            threads: 2,
            ..quiet(4, 5)
        })
        .unwrap();
        assert_eq!(sequential.len(), 4);
        for (s, p) in sequential.iter().zip(&parallel) {
            assert_eq!(s.game_id, p.game_id);
            assert_eq!(s.seed, p.seed);
            assert_eq!(s.turns, p.turns);
            assert_eq!(s.final_mana, p.final_mana);
        }
    }

    #[test]
    fn unreadable_deck_file_is_recorded_as_fallback() {
        let config = SelfPlayConfig {
            deck: Some(PathBuf::from("/nonexistent/aether-deck.json")),
            ..quiet(2, 4)
        };
        let games = run_self_play(&config).unwrap();
        assert!(games.iter().all(|g| g.fallback_deck));

        let games = run_self_play(&quiet(2, 4)).unwrap();
        assert!(games.iter().all(|g| !g.fallback_deck));
    }

    #[test]
    fn invalid_rules_are_reported() {
        let mut config = quiet(1, 1);
        config.game.board_size = 3;
        assert!(matches!(
            run_self_play(&config),
            Err(SelfPlayError::Config(ConfigError::BoardTooSmall(3)))
        ));
    }

    #[test]
    fn jsonl_has_one_object_per_line() {
        let games = run_self_play(&quiet(2, 8)).unwrap();
        let mut out = Vec::new();
        write_jsonl(&games, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["game_id"], 0);
        assert_eq!(first["seed"], 8);
        assert!(first["mana_history"].is_array());
    }

    #[test]
    fn summary_counts_outcomes() {
        let record = |winner: Option<usize>, turns: u32| GameRecord {
            game_id: 0,
            seed: 1,
            fallback_deck: false,
            winner: winner.map(PlayerId),
            turns,
            final_mana: vec![0, 0],
            tiles_owned: vec![0, 0],
            laps: vec![0, 0],
            battles: BattleTally { wins: 1, losses: 2, draws: 0 },
            mana_history: Vec::new(),
        };
        let s = summarize(&[record(Some(0), 10), record(Some(1), 20), record(None, 30)]);
        assert_eq!(s.games, 3);
        assert_eq!(s.wins, vec![1, 1]);
        assert_eq!(s.unfinished, 1);
        assert!((s.average_turns - 20.0).abs() < 1e-9);
        assert_eq!(s.battles.total(), 9);
    }
}
