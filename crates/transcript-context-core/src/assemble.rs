//! Bounded prompt-context assembly.
//!
//! Transcripts at or under `threshold_chars` are returned verbatim. Longer
//! transcripts are chunked, ranked against the query, and reduced to the
//! top `max_chunks` windows, optionally prefixed with a summary line:
//!
//! ```text
//! Summary: <summary>
//!
//! <chunk 1>
//!
//! <chunk 2>
//! ```

use crate::chunk::chunk_text;
use crate::error::ContextError;
use crate::rank::rank_chunks;

/// Default window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;
/// Default number of windows kept for a long transcript.
pub const DEFAULT_MAX_CHUNKS: usize = 3;

const CHUNK_SEPARATOR: &str = "\n\n";

/// Retrieval tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextParams {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Maximum chunks kept when a transcript is reduced.
    pub max_chunks: usize,
    /// Transcripts with at most this many characters pass through unchanged.
    pub threshold_chars: usize,
}

impl ContextParams {
    /// Build parameters with `threshold_chars = chunk_size * max_chunks`.
    pub fn new(chunk_size: usize, max_chunks: usize) -> Self {
        Self {
            chunk_size,
            max_chunks,
            threshold_chars: chunk_size.saturating_mul(max_chunks),
        }
    }

    /// Replace the derived pass-through threshold.
    pub fn with_threshold(mut self, threshold_chars: usize) -> Self {
        self.threshold_chars = threshold_chars;
        self
    }

    /// Reject a zero `chunk_size`.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.chunk_size == 0 {
            return Err(ContextError::InvalidArgument(
                "chunk_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `transcript` is long enough to need reducing.
    pub fn exceeds_threshold(&self, transcript: &str) -> bool {
        transcript.chars().count() > self.threshold_chars
    }
}

impl Default for ContextParams {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CHUNKS)
    }
}

/// Build the prompt context for `query` from `transcript`.
///
/// A blank `summary` is treated as absent. The result is deterministic for
/// identical inputs.
///
/// # Errors
///
/// [`ContextError::InvalidArgument`] if `params` is invalid, regardless of
/// the transcript's length.
pub fn assemble_context(
    transcript: &str,
    query: &str,
    summary: Option<&str>,
    params: &ContextParams,
) -> Result<String, ContextError> {
    params.validate()?;

    if !params.exceeds_threshold(transcript) {
        return Ok(transcript.to_string());
    }

    let chunks = chunk_text(transcript, params.chunk_size)?;
    let selected = rank_chunks(&chunks, query, params.max_chunks);

    let mut parts: Vec<String> = Vec::with_capacity(selected.len() + 1);
    if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
        parts.push(format!("Summary: {}", summary));
    }
    parts.extend(selected.into_iter().map(str::to_string));

    Ok(parts.join(CHUNK_SEPARATOR))
}
