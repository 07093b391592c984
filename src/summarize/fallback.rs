//! Deterministic model-free summarizer.
//!
//! Used when no language model is available (offline mode, or built without
//! the `openai` feature) and in tests. It drops greetings and small talk and
//! keeps a truncated copy of every remaining line.

use super::Summarizer;
use crate::error::SummarizeError;
use crate::io::unicode::truncate_graphemes;
use regex::Regex;
use std::sync::LazyLock;

/// Default per-line length limit, in grapheme clusters.
pub const DEFAULT_MAX_LINE_GRAPHEMES: usize = 160;

/// Whole-line greetings, thanks, and farewells.
#[allow(clippy::expect_used)]
static SMALL_TALK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*
        (hi|hello|hey|howdy|good\s+(morning|afternoon|evening)|
         thanks|thank\s+you|thx|ok(ay)?|cool|great|
         bye|goodbye|see\s+you|cheers)
        (\s+(there|so\s+much|a\s+lot|again))?
        [\s!.,:)]*$",
    )
    .expect("valid regex")
});

/// Extractive stand-in for a model-backed summarizer.
///
/// # Examples
///
/// ```
/// use convo_memory::summarize::{FallbackSummarizer, Summarizer, SUMMARY_INSTRUCTION};
///
/// let s = FallbackSummarizer::default();
/// let text = "user: hello\nuser: I need a 90cm oak door";
/// let summary = s.summarize(SUMMARY_INSTRUCTION, text).unwrap();
/// assert_eq!(summary, "user: I need a 90cm oak door");
/// ```
#[derive(Debug, Clone)]
pub struct FallbackSummarizer {
    max_line_graphemes: usize,
}

impl FallbackSummarizer {
    /// Creates a summarizer that truncates kept lines to `max_line_graphemes`.
    #[must_use]
    pub const fn new(max_line_graphemes: usize) -> Self {
        Self { max_line_graphemes }
    }

    fn is_small_talk(content: &str) -> bool {
        content.trim().is_empty() || SMALL_TALK.is_match(content)
    }
}

impl Default for FallbackSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_GRAPHEMES)
    }
}

impl Summarizer for FallbackSummarizer {
    fn summarize(&self, _instruction: &str, text: &str) -> Result<String, SummarizeError> {
        let kept: Vec<String> = text
            .lines()
            .filter(|line| {
                // Lines are "role: content"; judge only the content part.
                let content = line.split_once(':').map_or(*line, |(_, rest)| rest);
                !Self::is_small_talk(content)
            })
            .map(|line| {
                let line = line.trim();
                let cut = truncate_graphemes(line, self.max_line_graphemes);
                if cut.len() < line.len() {
                    format!("{cut}…")
                } else {
                    cut.to_string()
                }
            })
            .collect();

        if kept.is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }
        Ok(kept.join("; "))
    }
}
