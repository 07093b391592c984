//! Bounded conversation memory with on-demand summarization.
//!
//! [`ConversationMemory`] keeps the most recent raw messages in a fixed
//! capacity FIFO buffer plus an optional summary of everything compressed so
//! far. Callers decide when to compress; see
//! [`ConversationMemory::summarize_old_messages`].

use crate::config::DEFAULT_MAX_RAW_MESSAGES;
use crate::core::message::{Message, Role};
use crate::error::{Error, Result};
use crate::summarize::{SUMMARY_INSTRUCTION, Summarizer};
use std::collections::VecDeque;

/// Prefix of the synthetic system entry that carries the summary.
pub const SUMMARY_PREFIX: &str = "Conversation so far: ";

/// Recent-message buffer plus running summary for one conversation.
///
/// # Examples
///
/// ```
/// use convo_memory::core::{ConversationMemory, Message, Role};
/// use convo_memory::summarize::FnSummarizer;
///
/// let summarizer = FnSummarizer::new(|_: &str, _: &str| Ok("user wants a door".to_string()));
/// let mut memory = ConversationMemory::new(summarizer);
///
/// memory.add_message(Role::User, "I need a door");
/// memory.summarize_old_messages().unwrap();
/// memory.add_message(Role::User, "oak, please");
///
/// assert_eq!(
///     memory.get_context(),
///     vec![
///         Message::system("Conversation so far: user wants a door"),
///         Message::user("oak, please"),
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct ConversationMemory<S> {
    raw_messages: VecDeque<Message>,
    capacity: usize,
    summary: String,
    summarizer: S,
}

impl<S: Summarizer> ConversationMemory<S> {
    /// Creates an empty memory with the default capacity of 10 messages.
    pub fn new(summarizer: S) -> Self {
        Self {
            raw_messages: VecDeque::with_capacity(DEFAULT_MAX_RAW_MESSAGES),
            capacity: DEFAULT_MAX_RAW_MESSAGES,
            summary: String::new(),
            summarizer,
        }
    }

    /// Creates an empty memory holding at most `max_raw_messages` raw messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_raw_messages` is zero.
    pub fn with_capacity(summarizer: S, max_raw_messages: usize) -> Result<Self> {
        if max_raw_messages == 0 {
            return Err(Error::config("max raw messages must be positive"));
        }
        Ok(Self {
            raw_messages: VecDeque::with_capacity(max_raw_messages),
            capacity: max_raw_messages,
            summary: String::new(),
            summarizer,
        })
    }

    /// Appends a message, evicting the oldest one when the buffer is full.
    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.push(Message::new(role, content));
    }

    /// Appends a message whose role is given as free-form text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRole`] for an unknown role; nothing is added.
    pub fn add_raw_message(&mut self, role: &str, content: impl Into<String>) -> Result<()> {
        let role: Role = role.parse()?;
        self.add_message(role, content);
        Ok(())
    }

    /// Appends an already-built message with the same eviction rule.
    pub fn push(&mut self, message: Message) {
        if self.raw_messages.len() == self.capacity
            && let Some(evicted) = self.raw_messages.pop_front()
        {
            tracing::debug!(
                capacity = self.capacity,
                role = %evicted.role,
                "raw buffer full, evicted oldest message"
            );
        }
        self.raw_messages.push_back(message);
    }

    /// Builds the context to send to a language model.
    ///
    /// The summary, if any, comes first as a system entry, followed by the
    /// raw messages oldest to newest. The result is a fresh copy.
    #[must_use]
    pub fn get_context(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.raw_messages.len() + 1);
        if !self.summary.is_empty() {
            messages.push(Message::system(format!("{SUMMARY_PREFIX}{}", self.summary)));
        }
        messages.extend(self.raw_messages.iter().cloned());
        messages
    }

    /// Compresses the raw buffer into a new summary.
    ///
    /// Does nothing (and makes no summarizer call) when the buffer is empty.
    /// On success the summary is replaced by the trimmed result and the buffer
    /// is cleared. The previous summary is not part of the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Summarize`] if the summarizer fails. The buffer and
    /// summary are left untouched in that case.
    pub fn summarize_old_messages(&mut self) -> Result<()> {
        if self.raw_messages.is_empty() {
            tracing::debug!("raw buffer empty, nothing to summarize");
            return Ok(());
        }

        let raw_text = self
            .raw_messages
            .iter()
            .map(Message::transcript_line)
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!(count = self.raw_messages.len(), "summarizing raw messages");
        let summary = self
            .summarizer
            .summarize(SUMMARY_INSTRUCTION, &raw_text)
            .inspect_err(|e| {
                tracing::warn!(error = %e, "summarization failed, memory unchanged");
            })?;

        self.summary = summary.trim().to_string();
        self.raw_messages.clear();
        tracing::debug!(summary_len = self.summary.len(), "summary updated");
        Ok(())
    }

    /// Clears both the raw buffer and the summary.
    pub fn reset(&mut self) {
        self.raw_messages.clear();
        self.summary.clear();
        tracing::debug!("conversation memory reset");
    }

    /// Returns the current summary; empty means none yet.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Iterates over the raw messages, oldest first.
    pub fn raw_messages(&self) -> impl ExactSizeIterator<Item = &Message> {
        self.raw_messages.iter()
    }

    /// Returns the number of buffered raw messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw_messages.len()
    }

    /// Returns `true` if no raw messages are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_messages.is_empty()
    }

    /// Returns the raw buffer capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the next message would evict the oldest one.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.raw_messages.len() == self.capacity
    }
}
