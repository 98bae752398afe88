//! Line protocol handling.
//!
//! Parsing of client commands and formatting of the engine's reply lines
//! for the `aether` binary's stdin/stdout loop.

pub mod format;
pub mod parser;

pub use format::{format_hand, format_log_entry, format_status};
pub use parser::{parse_command, Command};
