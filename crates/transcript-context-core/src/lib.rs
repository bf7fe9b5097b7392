//! # Transcript Context Core
//!
//! Pure retrieval logic for Transcript Context: word-aligned chunking,
//! word-overlap ranking, and bounded prompt-context assembly.
//!
//! This crate performs no I/O and holds no state between calls. It has
//! no tokio, sqlx, or HTTP dependencies, so every operation can be called
//! from any thread or compiled to `wasm32-unknown-unknown`.
//!
//! ```rust
//! use transcript_context_core::{assemble_context, ContextParams};
//!
//! let params = ContextParams::default();
//! let context = assemble_context("a short transcript", "what", None, &params).unwrap();
//! assert_eq!(context, "a short transcript");
//! ```

pub mod assemble;
pub mod chunk;
pub mod error;
pub mod rank;

pub use assemble::{assemble_context, ContextParams};
pub use chunk::chunk_text;
pub use error::ContextError;
pub use rank::{rank_chunks, score_chunks, QueryTerms, ScoredChunk};
