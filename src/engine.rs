//! Engine state management.
//!
//! Holds the game in progress, the configuration for the next game, and
//! engine options. A human plays seat one through line commands; the CPU
//! seat and battle acknowledgements are advanced automatically after every
//! command so the client is only ever asked about its own decisions.

use std::collections::HashMap;
use std::io::{self, Write};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::card::{DeckSource, FallbackDeck, JsonDeckSource};
use crate::config::{ConfigError, GameConfig};
use crate::game::{default_roster, start_game, Action, GameError, GameState, LogEntry, Phase};
use crate::policy::next_cpu_action;
use crate::protocol::{format_hand, format_log_entry, format_status};

/// Theme used when `newgame` names none.
pub const DEFAULT_THEME: &str = "Classic Fantasy";

/// Why an engine command could not be carried out.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no game in progress")]
    NoGame,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub game: Option<GameState>,
    /// Configuration applied to the next `newgame`.
    pub config: GameConfig,
    pub options: HashMap<String, String>,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with no game and an entropy-seeded RNG.
    pub fn new() -> Self {
        Engine {
            game: None,
            config: GameConfig::default(),
            options: HashMap::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates an engine whose games replay exactly for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Engine {
            rng: SmallRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// Sets an engine option.
    ///
    /// `Seed` reseeds the RNG and `DeckFile` points the deck source at a
    /// JSON file (no value restores the fallback deck). Every other name
    /// is a game setting and takes effect at the next `newgame`.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.unwrap_or_default().to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "seed" => {
                let seed = value.and_then(|v| v.parse::<u64>().ok()).ok_or_else(invalid)?;
                self.rng = SmallRng::seed_from_u64(seed);
            }
            "deckfile" => {
                if value.is_none() {
                    self.options.remove("DeckFile");
                    return Ok(());
                }
            }
            _ => self.config.set_option(name, value.ok_or_else(invalid)?)?,
        }
        let key = if name.eq_ignore_ascii_case("deckfile") {
            "DeckFile".to_string()
        } else {
            name.to_string()
        };
        self.options.insert(key, value.unwrap_or_default().to_string());
        Ok(())
    }

    fn deck_source(&self) -> Box<dyn DeckSource> {
        match self.options.get("DeckFile") {
            Some(path) => Box::new(JsonDeckSource::new(path)),
            None => Box::new(FallbackDeck),
        }
    }

    /// Deals a new game against the CPU. Returns the opening log.
    pub fn new_game(&mut self, theme: Option<&str>) -> Result<Vec<LogEntry>, EngineError> {
        let source = self.deck_source();
        let theme = theme.unwrap_or(DEFAULT_THEME);
        let mut game = start_game(
            self.config.clone(),
            &default_roster(),
            source.as_ref(),
            theme,
            &mut self.rng,
        )?;
        run_automatic(&mut game, &mut self.rng)?;
        let log = game.log.clone();
        self.game = Some(game);
        Ok(log)
    }

    /// Plays `action` for the human seat, then advances everything that
    /// needs no human input. Returns the log entries produced.
    ///
    /// `Roll` rolls and moves in one go.
    pub fn play(&mut self, action: Action) -> Result<Vec<LogEntry>, EngineError> {
        let game = self.game.as_mut().ok_or(EngineError::NoGame)?;
        let seen = game.log.len();
        let human = game.current;

        if action == Action::Roll {
            // Roll and Move are one atomic step for the client.
            let mut next = game.clone();
            next.apply(human, Action::Roll, &mut self.rng)?;
            next.apply(human, Action::Move, &mut self.rng)?;
            *game = next;
        } else {
            game.apply(human, action, &mut self.rng)?;
        }
        run_automatic(game, &mut self.rng)?;
        Ok(game.log[seen..].to_vec())
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `setoption`, reporting a rejected option as an error line.
    pub fn handle_setoption<W: Write>(
        &mut self,
        name: &str,
        value: Option<&str>,
        out: &mut W,
    ) -> io::Result<()> {
        if let Err(e) = self.set_option(name, value) {
            writeln!(out, "error {}", e)?;
        }
        out.flush()
    }

    /// Handles `newgame`.
    pub fn handle_newgame<W: Write>(&mut self, theme: Option<&str>, out: &mut W) -> io::Result<()> {
        let result = self.new_game(theme);
        self.report(result, out)
    }

    /// Handles a gameplay command for the human seat.
    pub fn handle_action<W: Write>(&mut self, action: Action, out: &mut W) -> io::Result<()> {
        let result = self.play(action);
        self.report(result, out)
    }

    /// Writes the full game state as one JSON line.
    pub fn handle_state<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.game {
            Some(game) => {
                let json = serde_json::to_string(game).map_err(io::Error::other)?;
                writeln!(out, "state {}", json)?;
            }
            None => writeln!(out, "error {}", EngineError::NoGame)?,
        }
        out.flush()
    }

    /// Writes the per-turn mana series as one JSON line.
    pub fn handle_history<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.game {
            Some(game) => {
                let json = serde_json::to_string(&game.mana_history).map_err(io::Error::other)?;
                writeln!(out, "history {}", json)?;
            }
            None => writeln!(out, "error {}", EngineError::NoGame)?,
        }
        out.flush()
    }

    /// Writes the log entries of a command, the human's hand, and the
    /// status prompt, or an error line.
    fn report<W: Write>(
        &self,
        result: Result<Vec<LogEntry>, EngineError>,
        out: &mut W,
    ) -> io::Result<()> {
        match result {
            Ok(entries) => {
                for entry in &entries {
                    writeln!(out, "{}", format_log_entry(entry))?;
                }
                if let Some(game) = &self.game {
                    if !game.is_over() && !game.current_player().is_cpu() {
                        for line in format_hand(game.current_player()) {
                            writeln!(out, "{}", line)?;
                        }
                    }
                    writeln!(out, "{}", format_status(game))?;
                }
            }
            Err(e) => {
                log::debug!("command rejected: {}", e);
                writeln!(out, "error {}", e)?;
            }
        }
        out.flush()
    }
}

/// Advances CPU turns and dismisses battles until the game waits on a
/// human decision or ends.
pub fn run_automatic(game: &mut GameState, rng: &mut SmallRng) -> Result<(), GameError> {
    while !game.is_over() {
        let id = game.current;
        let action = if game.phase == Phase::Battle {
            Action::Acknowledge
        } else {
            match next_cpu_action(game) {
                Some(action) => action,
                None => break,
            }
        };
        game.apply(id, action, rng)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::with_seed(42)
    }

    #[test]
    fn new_engine_has_no_game() {
        let engine = Engine::new();
        assert!(engine.game.is_none());
        assert!(engine.options.is_empty());
        assert_eq!(engine.config, GameConfig::default());
    }

    #[test]
    fn play_without_game_is_an_error() {
        let mut engine = engine();
        assert!(matches!(engine.play(Action::Roll), Err(EngineError::NoGame)));
    }

    #[test]
    fn new_game_waits_for_human_roll() {
        let mut engine = engine();
        let log = engine.new_game(Some("Deep Sea")).unwrap();
        assert_eq!(log[0].message, "Game started! Theme: Deep Sea.");
        let game = engine.game.as_ref().unwrap();
        assert_eq!(game.phase, Phase::Roll);
        assert_eq!(game.turn, 1);
        assert!(!game.current_player().is_cpu());
    }

    #[test]
    fn roll_moves_and_hands_back_to_human() {
        let mut engine = engine();
        engine.new_game(None).unwrap();
        let entries = engine.play(Action::Roll).unwrap();
        assert!(entries[0].message.starts_with("Player rolled a "));
        let game = engine.game.as_ref().unwrap();
        // Either the human has a land decision, or the CPU already played.
        assert!(game.is_over() || !game.current_player().is_cpu());
        assert!(matches!(game.phase, Phase::Roll | Phase::LandAction | Phase::GameOver));
    }

    #[test]
    fn rejected_action_keeps_game() {
        let mut engine = engine();
        engine.new_game(None).unwrap();
        let before = engine.game.clone();
        let err = engine.play(Action::PayToll).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Game(GameError::WrongPhase { action: "pay", phase: Phase::Roll })
        ));
        assert_eq!(engine.game, before);
    }

    #[test]
    fn options_configure_next_game() {
        let mut engine = engine();
        engine.set_option("StartingMana", Some("900")).unwrap();
        engine.set_option("BoardSize", Some("12")).unwrap();
        engine.new_game(None).unwrap();
        let game = engine.game.as_ref().unwrap();
        assert_eq!(game.board.len(), 12);
        assert_eq!(game.players[0].mana, 900);
        assert_eq!(engine.options.get("StartingMana"), Some(&"900".to_string()));
    }

    #[test]
    fn bad_options_are_rejected() {
        let mut engine = engine();
        assert!(matches!(
            engine.set_option("Gravity", Some("1")),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            engine.set_option("Seed", Some("abc")),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            engine.set_option("LapBonus", None),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn invalid_config_fails_new_game() {
        let mut engine = engine();
        engine.set_option("BoardSize", Some("4")).unwrap();
        assert!(matches!(
            engine.new_game(None),
            Err(EngineError::Config(ConfigError::BoardTooSmall(4)))
        ));
        assert!(engine.game.is_none());
    }

    #[test]
    fn missing_deck_file_falls_back() {
        let mut engine = engine();
        engine
            .set_option("DeckFile", Some("/nonexistent/aether-deck.json"))
            .unwrap();
        let log = engine.new_game(None).unwrap();
        assert!(log[0].message.contains("fallback deck"));
        engine.set_option("DeckFile", None).unwrap();
        assert!(!engine.options.contains_key("DeckFile"));
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = Engine::with_seed(9);
        let mut b = Engine::with_seed(9);
        a.new_game(None).unwrap();
        b.new_game(None).unwrap();
        a.play(Action::Roll).unwrap();
        b.play(Action::Roll).unwrap();
        assert_eq!(a.game, b.game);
    }

    #[test]
    fn handlers_write_protocol_lines() {
        let mut engine = engine();
        let mut out = Vec::new();
        engine.handle_isready(&mut out).unwrap();
        engine.handle_action(Action::Roll, &mut out).unwrap();
        engine.handle_newgame(None, &mut out).unwrap();
        engine.handle_history(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "readyok");
        assert_eq!(lines[1], "error no game in progress");
        assert!(lines[2].starts_with("event info Game started!"));
        assert!(lines.iter().any(|l| l.starts_with("card 0 ")));
        assert!(lines.iter().any(|l| l.starts_with("status turn 1 player p1 phase ROLL")));
        assert!(lines
            .last()
            .unwrap()
            .starts_with(r#"history [{"turn":0,"player1_mana":500,"player2_mana":500}"#));
    }

    #[test]
    fn automatic_play_finishes_cpu_only_games() {
        use crate::card::fallback_deck;
        use crate::game::{new_game, PlayerSetup};
        let roster = [PlayerSetup::cpu("A", "#000"), PlayerSetup::cpu("B", "#fff")];
        let mut rng = SmallRng::seed_from_u64(5);
        let mut game =
            new_game(GameConfig::default(), &roster, &fallback_deck(), "Sim", false, &mut rng).unwrap();
        run_automatic(&mut game, &mut rng).unwrap();
        assert!(game.is_over());
        assert!(game.winner.is_some());
    }
}
