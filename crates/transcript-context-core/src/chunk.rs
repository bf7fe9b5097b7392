//! Word-boundary transcript chunker.
//!
//! Splits transcript text into contiguous, non-overlapping windows of at
//! most `chunk_size` characters. Splitting only ever happens between
//! words, so a window never ends in the middle of a word.
//!
//! # Algorithm
//!
//! 1. Split the text on whitespace. Runs of whitespace collapse and
//!    leading/trailing whitespace is dropped.
//! 2. Append words to the current window, separated by a single space,
//!    while the window stays within `chunk_size` characters.
//! 3. When the next word would overflow the window, flush the window and
//!    start a new one with that word.
//! 4. A word that is longer than `chunk_size` on its own becomes a window
//!    by itself, untruncated.
//! 5. Flush the last non-empty window.
//!
//! Lengths are counted in `char`s, not bytes.
//!
//! # Example
//!
//! ```rust
//! use transcript_context_core::chunk::chunk_text;
//!
//! let chunks = chunk_text("the quick brown fox jumps", 10).unwrap();
//! assert_eq!(chunks, vec!["the quick", "brown fox", "jumps"]);
//! ```

use crate::error::ContextError;

/// Split `text` into word-aligned windows of at most `chunk_size` chars.
///
/// Returns windows in transcript order. Empty or whitespace-only input
/// yields no windows.
///
/// # Errors
///
/// [`ContextError::InvalidArgument`] if `chunk_size` is zero.
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<String>, ContextError> {
    if chunk_size == 0 {
        return Err(ContextError::InvalidArgument(
            "chunk_size must be > 0".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut current_buf = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_buf.is_empty() {
            current_buf.push_str(word);
            current_len = word_len;
            continue;
        }

        if current_len + 1 + word_len <= chunk_size {
            current_buf.push(' ');
            current_buf.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::take(&mut current_buf));
            current_buf.push_str(word);
            current_len = word_len;
        }
    }

    if !current_buf.is_empty() {
        chunks.push(current_buf);
    }

    Ok(chunks)
}
