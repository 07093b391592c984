//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{ContextReport, OutputFormat, format_report};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::{ConversationMemory, Message};
use crate::error::Result;
use crate::io::read_transcript;
use crate::summarize::{FallbackSummarizer, Summarizer, create_summarizer};
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = cli.format;
    let config = cli.config()?;
    tracing::debug!(?config, "configuration loaded");

    match &cli.command {
        Commands::Context { transcript } => cmd_context(&config, transcript, format),
        Commands::Summarize { transcript, auto } => {
            cmd_summarize(&config, transcript, *auto, cli.offline, format)
        }
    }
}

/// Counters gathered while replaying a transcript.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Messages fed into the memory.
    pub loaded: usize,
    /// Messages dropped by FIFO eviction.
    pub evicted: usize,
    /// Successful summarization rounds.
    pub summaries: usize,
}

/// Feeds `messages` into `memory` in order.
///
/// With `auto`, a full buffer is summarized before the next message is added,
/// so nothing is evicted. Without it, the oldest message is evicted.
///
/// # Errors
///
/// Returns an error if an automatic summarization fails.
pub fn replay<S: Summarizer>(
    memory: &mut ConversationMemory<S>,
    messages: Vec<Message>,
    auto: bool,
) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for message in messages {
        if memory.is_full() {
            if auto {
                memory.summarize_old_messages()?;
                stats.summaries += 1;
            } else {
                stats.evicted += 1;
            }
        }
        memory.push(message);
        stats.loaded += 1;
    }

    Ok(stats)
}

fn report<S: Summarizer>(memory: &ConversationMemory<S>, stats: ReplayStats) -> ContextReport {
    ContextReport {
        summary: Some(memory.summary())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        context: memory.get_context(),
        loaded: stats.loaded,
        evicted: stats.evicted,
        summaries: stats.summaries,
    }
}

fn cmd_context(config: &Config, transcript: &Path, format: OutputFormat) -> Result<String> {
    let messages = read_transcript(transcript)?;

    // No summarization happens here, so no model backend is needed.
    let mut memory =
        ConversationMemory::with_capacity(FallbackSummarizer::default(), config.max_raw_messages)?;
    let stats = replay(&mut memory, messages, false)?;

    Ok(format_report(&report(&memory, stats), format))
}

fn cmd_summarize(
    config: &Config,
    transcript: &Path,
    auto: bool,
    offline: bool,
    format: OutputFormat,
) -> Result<String> {
    let messages = read_transcript(transcript)?;

    let summarizer = create_summarizer(config, offline)?;
    let mut memory = ConversationMemory::with_capacity(summarizer, config.max_raw_messages)?;
    let mut stats = replay(&mut memory, messages, auto)?;

    if !memory.is_empty() {
        memory.summarize_old_messages()?;
        stats.summaries += 1;
    }

    Ok(format_report(&report(&memory, stats), format))
}
