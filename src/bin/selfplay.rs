//! Self-play CLI.
//!
//! Plays CPU-vs-CPU games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Progress and the summary are logged to stderr; set `RUST_LOG=info`
//! to see them.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use aether::config::GameConfig;
use aether::selfplay::{self, SelfPlayConfig};

#[derive(Parser, Debug)]
#[command(name = "selfplay", about = "Play CPU-vs-CPU games and emit JSONL records")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Turn cap; longer games are recorded unfinished
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Base random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JSON deck file to deal from instead of the fallback deck
    #[arg(long)]
    deck: Option<PathBuf>,

    /// JSON rules file; missing fields keep their defaults
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Re-check game invariants after every transition
    #[arg(long)]
    check: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress per-game progress and the summary
    #[arg(short, long)]
    quiet: bool,
}

fn load_rules(path: &Path) -> Result<GameConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read rules '{}': {}", path.display(), e))?;
    let rules: GameConfig = serde_json::from_str(&text)
        .map_err(|e| format!("malformed rules '{}': {}", path.display(), e))?;
    rules.validate().map_err(|e| e.to_string())?;
    Ok(rules)
}

fn run(args: Args) -> Result<(), String> {
    let game = match &args.rules {
        Some(path) => load_rules(path)?,
        None => GameConfig::default(),
    };
    let config = SelfPlayConfig {
        num_games: args.games,
        max_turns: args.max_turns,
        threads: args.threads,
        seed: args.seed,
        deck: args.deck,
        check_invariants: args.check,
        quiet: args.quiet,
        game,
    };

    if !config.quiet {
        log::info!(
            "self-play: {} games, turn cap {}, {} threads, seed {}",
            config.num_games,
            config.max_turns,
            config.threads,
            config.seed
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config).map_err(|e| e.to_string())?;
    let elapsed = start.elapsed();

    if !config.quiet {
        log::info!(
            "completed {} games in {:.2}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::log_summary(&games);
    }

    let written = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("failed to create '{}': {}", path.display(), e))?;
            selfplay::write_jsonl(&games, &mut BufWriter::new(file))
        }
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))
        }
    };
    written.map_err(|e| format!("failed to write output: {}", e))?;

    if let (Some(path), false) = (&args.output, config.quiet) {
        log::info!("wrote {} games to {}", games.len(), path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("selfplay: {}", e);
            ExitCode::FAILURE
        }
    }
}
