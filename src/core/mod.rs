//! Core domain models for conversation memory.
//!
//! This module contains the message model and the bounded conversation
//! memory. These are pure domain types with no I/O dependencies; the
//! summarization backend is injected.

pub mod memory;
pub mod message;

pub use memory::{ConversationMemory, SUMMARY_PREFIX};
pub use message::{Message, Role};
