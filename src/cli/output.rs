//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::Message;
use crate::error::Error;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Result of replaying a transcript through a conversation memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextReport {
    /// Current summary, if one was produced.
    pub summary: Option<String>,
    /// Context as it would be sent to a language model.
    pub context: Vec<Message>,
    /// Messages read from the transcript.
    pub loaded: usize,
    /// Messages dropped by FIFO eviction.
    pub evicted: usize,
    /// Successful summarization rounds.
    pub summaries: usize,
}

/// Formats a replay report.
#[must_use]
pub fn format_report(report: &ContextReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_report_text(report),
        OutputFormat::Json => format_json(report),
    }
}

fn format_report_text(report: &ContextReport) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Summary: {}",
        report.summary.as_deref().unwrap_or("(none)")
    );
    output.push('\n');

    if report.context.is_empty() {
        output.push_str("Context is empty.\n");
    } else {
        let _ = writeln!(output, "Context ({} entries):", report.context.len());
        for message in &report.context {
            let _ = writeln!(output, "  [{}] {}", message.role, message.content);
        }
    }

    output.push('\n');
    let _ = writeln!(
        output,
        "Loaded: {}  Evicted: {}  Summaries: {}",
        report.loaded, report.evicted, report.summaries
    );
    output
}

/// Formats an error for display.
///
/// Text output is the bare message; JSON output wraps it in an `error` object.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({ "error": err.to_string() })),
    }
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
