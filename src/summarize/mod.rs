//! Summarization capability consumed by the conversation memory.
//!
//! The memory core only needs "given an instruction and a text blob, return a
//! summary". Backends implement [`Summarizer`]:
//!
//! - [`FallbackSummarizer`]: deterministic, model-free (always available)
//! - `OpenAiSummarizer`: chat-completion call with a timeout (feature `openai`)
//!
//! # Feature Flags
//!
//! - `openai`: Enables the OpenAI backend and makes it the default in
//!   [`create_summarizer`]
//! - Without the feature: [`create_summarizer`] always returns the fallback

mod fallback;

#[cfg(feature = "openai")]
mod openai;

pub use fallback::FallbackSummarizer;

#[cfg(feature = "openai")]
pub use openai::OpenAiSummarizer;

use crate::config::Config;
use crate::error::SummarizeError;
use std::sync::Arc;

/// Instruction sent with every summarization request.
pub const SUMMARY_INSTRUCTION: &str = "You are a summarisation assistant. Read the following conversation and return a concise summary that preserves all important context, user needs, and decisions. Do not include greetings or small talk.";

/// Trait for summarization backends.
///
/// Implementations must be thread-safe (`Send + Sync`) so a single backend can
/// be shared by several conversation memories.
///
/// # Examples
///
/// ```
/// use convo_memory::summarize::{FnSummarizer, Summarizer};
///
/// let upper = FnSummarizer::new(|_instruction: &str, text: &str| Ok(text.to_uppercase()));
/// assert_eq!(upper.summarize("ignored", "user: hi").unwrap(), "USER: HI");
/// ```
pub trait Summarizer: Send + Sync {
    /// Summarizes `text` following `instruction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails, times out, or answers with
    /// nothing usable.
    fn summarize(&self, instruction: &str, text: &str) -> Result<String, SummarizeError>;
}

impl<S: Summarizer + ?Sized> Summarizer for &S {
    fn summarize(&self, instruction: &str, text: &str) -> Result<String, SummarizeError> {
        (**self).summarize(instruction, text)
    }
}

impl<S: Summarizer + ?Sized> Summarizer for Box<S> {
    fn summarize(&self, instruction: &str, text: &str) -> Result<String, SummarizeError> {
        (**self).summarize(instruction, text)
    }
}

impl<S: Summarizer + ?Sized> Summarizer for Arc<S> {
    fn summarize(&self, instruction: &str, text: &str) -> Result<String, SummarizeError> {
        (**self).summarize(instruction, text)
    }
}

/// Adapts a plain function or closure into a [`Summarizer`].
#[derive(Debug, Clone)]
pub struct FnSummarizer<F> {
    func: F,
}

impl<F> FnSummarizer<F>
where
    F: Fn(&str, &str) -> Result<String, SummarizeError> + Send + Sync,
{
    /// Wraps `func`.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Summarizer for FnSummarizer<F>
where
    F: Fn(&str, &str) -> Result<String, SummarizeError> + Send + Sync,
{
    fn summarize(&self, instruction: &str, text: &str) -> Result<String, SummarizeError> {
        (self.func)(instruction, text)
    }
}

/// Creates the default summarizer based on available features.
///
/// - `offline == true`: Returns `FallbackSummarizer`
/// - With `openai`: Returns `OpenAiSummarizer` (requires an API key)
/// - Without: Returns `FallbackSummarizer`
///
/// # Errors
///
/// Returns an error if the API key is missing or the client cannot be built.
#[cfg(feature = "openai")]
pub fn create_summarizer(config: &Config, offline: bool) -> crate::Result<Box<dyn Summarizer>> {
    if offline {
        return Ok(Box::new(FallbackSummarizer::default()));
    }
    Ok(Box::new(OpenAiSummarizer::from_config(config)?))
}

/// Creates the default summarizer based on available features.
///
/// - `offline == true`: Returns `FallbackSummarizer`
/// - With `openai`: Returns `OpenAiSummarizer` (requires an API key)
/// - Without: Returns `FallbackSummarizer`
///
/// # Errors
///
/// Never fails without the `openai` feature.
#[cfg(not(feature = "openai"))]
pub fn create_summarizer(_config: &Config, offline: bool) -> crate::Result<Box<dyn Summarizer>> {
    if !offline {
        tracing::debug!("built without the openai feature; using fallback summarizer");
    }
    Ok(Box::new(FallbackSummarizer::default()))
}
