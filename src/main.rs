//! Aether -- a territory-and-creatures board game engine on a line protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! The client plays seat one; the CPU rival moves on its own. Logs go to
//! stderr and are controlled with `RUST_LOG`.

use std::io::{self, BufRead};

use aether::engine::Engine;
use aether::game::Action;
use aether::protocol::{parse_command, Command};

/// Runs the protocol loop until `quit` or end of input.
fn main() -> io::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("failed to read stdin: {}", e);
                break;
            }
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => {
                engine.handle_setoption(&name, value.as_deref(), &mut out)?
            }
            Command::NewGame { theme } => engine.handle_newgame(theme.as_deref(), &mut out)?,
            Command::Roll => engine.handle_action(Action::Roll, &mut out)?,
            Command::Summon { index } => {
                engine.handle_action(Action::Summon { hand_index: index }, &mut out)?
            }
            Command::Pass => engine.handle_action(Action::Pass, &mut out)?,
            Command::Pay => engine.handle_action(Action::PayToll, &mut out)?,
            Command::Fight { index } => {
                engine.handle_action(Action::Fight { hand_index: index }, &mut out)?
            }
            Command::State => engine.handle_state(&mut out)?,
            Command::History => engine.handle_history(&mut out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}
