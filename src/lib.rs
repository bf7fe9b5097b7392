//! # Transcript Context
//!
//! Transcript caching and context-budgeted retrieval for chatting about a
//! video with a language model.
//!
//! A transcript (from audio transcription, page scraping, or a paste) is
//! cached per video. When a question comes in, short transcripts are sent
//! whole; long ones are cut into word-aligned chunks, ranked by word
//! overlap with the question, and reduced to the best few chunks behind a
//! cached summary.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌──────────────────┐   ┌─────────────┐
//! │  ingest    │──▶│   SQLite    │──▶│ chunk → rank →   │──▶│ ChatClient  │
//! │ file/stdin │   │ transcripts │   │ assemble (core)  │   │ (OpenAI API)│
//! └────────────┘   │ + summaries │   └──────────────────┘   └─────────────┘
//!                  └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tcx init
//! tcx ingest dQw4w9WgXcQ --file transcript.txt --title "Raised beds"
//! tcx chunks dQw4w9WgXcQ --query "how much compost"
//! tcx context dQw4w9WgXcQ "how much compost"
//! tcx ask dQw4w9WgXcQ "how much compost do I need?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Transcript, summary, and chat message types |
//! | [`db`] / [`migrate`] | SQLite connection and schema |
//! | [`store`] | Transcript and summary cache |
//! | [`chat`] | Chat-completion client abstraction |
//! | [`prompt`] | System prompts and message lists |
//! | [`summary`] | Summary generation policy |
//! | [`retrieve`] | Context assembly over cached transcripts |
//! | [`ingest`], [`get`], [`ask`] | CLI command implementations |
//!
//! The pure chunking, ranking, and assembly logic lives in
//! [`transcript_context_core`].

pub mod ask;
pub mod chat;
pub mod config;
pub mod db;
pub mod get;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod prompt;
pub mod retrieve;
pub mod store;
pub mod summary;
