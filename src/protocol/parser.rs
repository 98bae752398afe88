//! Line protocol command parser.
//!
//! Turns raw input lines into `Command` values the main loop dispatches on.

/// A parsed client-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the engine replies `readyok`.
    IsReady,

    /// Set an option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Deal a new game, optionally themed: `newgame [theme words...]`.
    NewGame { theme: Option<String> },

    /// Roll and move the human player.
    Roll,

    /// Summon the hand card at `index` on the free tile underfoot.
    Summon { index: usize },

    /// Decline to summon.
    Pass,

    /// Pay the toll on enemy land.
    Pay,

    /// Fight the enemy occupant with the hand card at `index`.
    Fight { index: usize },

    /// Dump the full game state as JSON.
    State,

    /// Dump the per-turn mana series as JSON.
    History,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines and unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    match head {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "roll" => Some(Command::Roll),
        "pass" => Some(Command::Pass),
        "pay" => Some(Command::Pay),
        "state" => Some(Command::State),
        "history" => Some(Command::History),

        "newgame" => Some(Command::NewGame {
            theme: if args.is_empty() {
                None
            } else {
                Some(args.join(" "))
            },
        }),
        "summon" => parse_index(head, args).map(|index| Command::Summon { index }),
        "fight" => parse_index(head, args).map(|index| Command::Fight { index }),
        "setoption" => parse_setoption(args),

        other => {
            log::warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses the hand index argument of `summon` and `fight`.
fn parse_index(command: &str, args: &[&str]) -> Option<usize> {
    let Some(raw) = args.first() else {
        log::warn!("malformed {}: expected '{} <hand index>'", command, command);
        return None;
    };
    match raw.parse::<usize>() {
        Ok(i) => Some(i),
        Err(_) => {
            log::warn!("invalid hand index for {}: '{}'", command, raw);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(args: &[&str]) -> Option<Command> {
    if args.len() < 2 || args[0] != "name" {
        log::warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }
    let rest = &args[1..];

    let (name_parts, value_parts) = match rest.iter().position(|&t| t == "value") {
        Some(vi) => (&rest[..vi], &rest[vi + 1..]),
        None => (rest, &rest[rest.len()..]),
    };
    if name_parts.is_empty() {
        log::warn!("malformed setoption: empty name");
        return None;
    }
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}
