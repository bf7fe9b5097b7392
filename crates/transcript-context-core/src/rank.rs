//! Word-overlap relevance ranking.
//!
//! Each chunk is scored against a query by counting how many of the
//! chunk's words (with repetition) appear in the query's word set.
//! Matching is case-insensitive and purely lexical: there is no
//! stemming, stopword removal, or punctuation stripping, so `"soil,"`
//! does not match `"soil"`.
//!
//! # Ordering
//!
//! Chunks are sorted by score descending with a stable sort, so chunks
//! with equal scores keep their transcript order. An empty query scores
//! every chunk 0 and the ranking degenerates to the first `max_chunks`
//! chunks in their original order.

use serde::Serialize;
use std::collections::HashSet;

/// The normalized word set of a query.
///
/// Words are lower-cased and deduplicated; repeating a word in the query
/// does not increase its weight.
#[derive(Debug, Clone, Default)]
pub struct QueryTerms {
    words: HashSet<String>,
}

impl QueryTerms {
    pub fn new(query: &str) -> Self {
        Self {
            words: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Count the words of `text` (with repetition) that are query terms.
    pub fn score(&self, text: &str) -> usize {
        if self.words.is_empty() {
            return 0;
        }
        text.split_whitespace()
            .filter(|w| self.words.contains(&w.to_lowercase()))
            .count()
    }
}

/// A chunk with its relevance score and its position in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredChunk<'a> {
    /// Zero-based position of the chunk in transcript order.
    pub index: usize,
    /// Number of chunk words that are query terms.
    pub score: usize,
    pub text: &'a str,
}

/// Score every chunk against `query` and return them in ranked order.
///
/// The sort is stable: ties keep transcript order.
pub fn score_chunks<'a, S: AsRef<str>>(chunks: &'a [S], query: &str) -> Vec<ScoredChunk<'a>> {
    let terms = QueryTerms::new(query);

    let mut scored: Vec<ScoredChunk<'a>> = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let text = chunk.as_ref();
            ScoredChunk {
                index,
                score: terms.score(text),
                text,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Return the text of the `max_chunks` highest-scoring chunks.
///
/// The result never has more than `min(max_chunks, chunks.len())`
/// entries.
pub fn rank_chunks<'a, S: AsRef<str>>(
    chunks: &'a [S],
    query: &str,
    max_chunks: usize,
) -> Vec<&'a str> {
    score_chunks(chunks, query)
        .into_iter()
        .take(max_chunks)
        .map(|sc| sc.text)
        .collect()
}
