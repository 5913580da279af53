//! karmactl library - command handlers and terminal output.

pub mod commands;
pub mod errors;
pub mod input;
pub mod logging;
pub mod output;
