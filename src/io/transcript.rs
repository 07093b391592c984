//! Transcript reading and parsing.
//!
//! A transcript is UTF-8 text with one message per line in `role: content`
//! form. Blank lines and lines starting with `#` are ignored.

use crate::core::{Message, Role};
use crate::error::{Error, IoError, Result};
use std::io::Read;
use std::path::Path;

/// Path value that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Parses transcript text into messages.
///
/// # Errors
///
/// Returns [`Error::Transcript`] with the 1-based line number when a line has
/// no `:` separator or names an unknown role.
///
/// # Examples
///
/// ```
/// use convo_memory::core::Role;
/// use convo_memory::io::parse_transcript;
///
/// let messages = parse_transcript("user: hi\n\nassistant: hello").unwrap();
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[1].role, Role::Assistant);
/// ```
pub fn parse_transcript(text: &str) -> Result<Vec<Message>> {
    let mut messages = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((role, content)) = trimmed.split_once(':') else {
            return Err(Error::Transcript {
                line: line_no,
                reason: "missing ':' separator".to_string(),
            });
        };

        let role = role.parse::<Role>().map_err(|e| Error::Transcript {
            line: line_no,
            reason: e.to_string(),
        })?;

        // Only the single space after the colon is formatting.
        let content = content.strip_prefix(' ').unwrap_or(content);
        messages.push(Message::new(role, content.trim_end_matches('\r')));
    }

    Ok(messages)
}

/// Reads and parses a transcript file, or standard input for `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn read_transcript(path: &Path) -> Result<Vec<Message>> {
    let text = if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        let path_str = path.to_string_lossy().to_string();
        if !path.exists() {
            return Err(IoError::FileNotFound { path: path_str }.into());
        }
        std::fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
            path: path_str,
            reason: e.to_string(),
        })?
    };

    let messages = parse_transcript(&text)?;
    tracing::debug!(path = %path.display(), count = messages.len(), "transcript loaded");
    Ok(messages)
}
