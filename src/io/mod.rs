//! Input utilities for conversation transcripts.
//!
//! Provides transcript reading and parsing along with Unicode helpers.

pub mod transcript;
pub mod unicode;

pub use transcript::{STDIN_PATH, parse_transcript, read_transcript};
pub use unicode::truncate_graphemes;
