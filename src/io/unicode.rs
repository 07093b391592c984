//! Unicode utilities for text processing.
//!
//! Truncation happens on grapheme cluster boundaries so summaries never
//! split a user-perceived character.

use unicode_segmentation::UnicodeSegmentation;

/// Truncates a string at a grapheme cluster boundary.
///
/// # Arguments
///
/// * `s` - The string to truncate.
/// * `max_graphemes` - Maximum number of grapheme clusters.
///
/// # Returns
///
/// A string slice containing at most `max_graphemes` grapheme clusters.
///
/// # Examples
///
/// ```
/// use convo_memory::io::unicode::truncate_graphemes;
///
/// assert_eq!(truncate_graphemes("Hello", 3), "Hel");
/// assert_eq!(truncate_graphemes("世界", 5), "世界");
/// ```
#[must_use]
pub fn truncate_graphemes(s: &str, max_graphemes: usize) -> &str {
    let mut end_byte = 0;

    for (count, grapheme) in s.graphemes(true).enumerate() {
        if count >= max_graphemes {
            break;
        }
        end_byte += grapheme.len();
    }

    &s[..end_byte]
}
