//! # convo-memory
//!
//! Bounded conversation memory for chat bots.
//!
//! A [`ConversationMemory`] keeps the most recent raw messages of a
//! conversation in a fixed-capacity FIFO buffer and, when the caller asks,
//! compresses them into a running summary through an injected
//! [`Summarizer`]. The resulting context (summary first, then recent
//! messages) stays bounded no matter how long the conversation runs.
//!
//! ## Features
//!
//! - **Bounded buffer**: oldest messages are evicted once capacity is reached
//! - **Summarize on demand**: one-shot compression, atomic on success
//! - **Pluggable backends**: OpenAI (feature `openai`) or a deterministic fallback
//! - **CLI**: replay `role: content` transcripts and inspect the context

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod summarize;

// Re-export commonly used types at crate root
pub use error::{Error, Result, SummarizeError};

// Re-export core domain types
pub use core::{ConversationMemory, Message, Role, SUMMARY_PREFIX};

// Re-export configuration
pub use config::{Config, DEFAULT_MAX_RAW_MESSAGES};

// Re-export summarization types
#[cfg(feature = "openai")]
pub use summarize::OpenAiSummarizer;
pub use summarize::{
    FallbackSummarizer, FnSummarizer, SUMMARY_INSTRUCTION, Summarizer, create_summarizer,
};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
