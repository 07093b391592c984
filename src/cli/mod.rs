//! CLI layer for convo-memory.
//!
//! Provides the command-line interface using clap, with commands for
//! replaying transcripts through a conversation memory and summarizing them.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
