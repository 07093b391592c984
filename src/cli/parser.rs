//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::cli::output::OutputFormat;
use crate::config::{
    Config, DEFAULT_MAX_RAW_MESSAGES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, default_secrets_path,
};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// convo-memory: bounded conversation memory for chat bots.
///
/// Replays `role: content` transcripts through a fixed-size message buffer
/// and compresses them into an LLM-written summary.
#[derive(Parser, Debug)]
#[command(name = "convo-memory")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// TOML secrets file holding `OPENAI_API_KEY` (overrides the environment).
    ///
    /// Defaults to `.streamlit/secrets.toml` in the current directory.
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    /// Chat model used for summaries.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Maximum number of raw messages kept before the oldest is evicted.
    #[arg(
        short = 'n',
        long,
        env = "CONVO_MAX_RAW_MESSAGES",
        default_value_t = DEFAULT_MAX_RAW_MESSAGES,
        global = true
    )]
    pub max_raw_messages: usize,

    /// Timeout for one summarization call, in seconds.
    #[arg(
        long,
        env = "CONVO_SUMMARY_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true
    )]
    pub timeout_secs: u64,

    /// Use the built-in extractive summarizer instead of a language model.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format.
    #[arg(long, value_enum, global = true, default_value = "text", ignore_case = true)]
    pub format: OutputFormat,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a transcript and print the resulting context.
    ///
    /// Never summarizes; shows which messages survive FIFO eviction.
    Context {
        /// Transcript file (`role: content` per line), or `-` for stdin.
        transcript: PathBuf,
    },

    /// Replay a transcript and summarize it.
    ///
    /// The remaining buffer is always summarized at the end.
    Summarize {
        /// Transcript file (`role: content` per line), or `-` for stdin.
        transcript: PathBuf,

        /// Summarize whenever the buffer is full instead of evicting.
        #[arg(long)]
        auto: bool,
    },
}

impl Cli {
    /// Returns the secrets path, using the default if not specified.
    #[must_use]
    pub fn secrets_path(&self) -> PathBuf {
        self.secrets.clone().unwrap_or_else(default_secrets_path)
    }

    /// Builds the immutable process configuration from the arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid limits or an unreadable secrets file.
    pub fn config(&self) -> Result<Config> {
        Config::load(
            self.api_key.clone(),
            Some(&self.secrets_path()),
            self.model.clone(),
            self.max_raw_messages,
            self.timeout_secs,
        )
    }
}
