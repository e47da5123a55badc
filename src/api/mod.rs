//! Operator-facing command interface
//!
//! Named commands bound to the map tools, and the parser for the console
//! that drives them.

pub mod commands;
pub mod console;

pub use commands::{register_map_commands, Command, CommandHandler, CommandTable};
pub use console::{ConsoleError, ConsoleInput};
