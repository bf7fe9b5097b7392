//! Context retrieval over cached transcripts: `tcx chunks` and `tcx context`.
//!
//! [`build_context`] is shared with `tcx ask`: it picks the summary to use,
//! then hands the transcript to the core assembler.

use anyhow::{bail, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use transcript_context_core::{assemble_context, chunk_text, score_chunks, ContextParams};

use crate::chat::{self, ChatClient};
use crate::config::Config;
use crate::db;
use crate::models::TranscriptRecord;
use crate::store;
use crate::summary;

/// Assemble the prompt context for `query` from a cached transcript.
///
/// With a `client`, a missing summary is generated on demand; a failed
/// summary call is logged and the context is built without one. Without
/// a client only an already-cached summary is used.
pub async fn build_context(
    pool: &SqlitePool,
    client: Option<&dyn ChatClient>,
    transcript: &TranscriptRecord,
    query: &str,
    params: &ContextParams,
) -> Result<String> {
    let summary = match client {
        Some(client) => match summary::ensure_summary(pool, client, transcript, params).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    video_id = %transcript.video_id,
                    error = %e,
                    "summary generation failed; continuing without summary"
                );
                None
            }
        },
        None if params.exceeds_threshold(&transcript.body) => {
            store::get_valid_summary(pool, &transcript.video_id, &transcript.hash)
                .await?
                .map(|s| s.summary)
        }
        None => None,
    };

    let context = assemble_context(&transcript.body, query, summary.as_deref(), params)?;

    tracing::debug!(
        video_id = %transcript.video_id,
        transcript_chars = transcript.char_len(),
        context_chars = context.chars().count(),
        with_summary = summary.is_some(),
        "assembled context"
    );

    Ok(context)
}

async fn load_transcript(pool: &SqlitePool, video_id: &str) -> Result<TranscriptRecord> {
    match store::get_transcript(pool, video_id).await? {
        Some(t) => Ok(t),
        None => {
            bail!(
                "transcript not found: {}. Run `tcx ingest {}` first.",
                video_id,
                video_id
            )
        }
    }
}

/// `tcx context` — print the context that `ask` would send.
pub async fn run_context(
    config: &Config,
    video_id: &str,
    query: &str,
    summarize: bool,
) -> Result<()> {
    let params = config.context.params();
    let client = if summarize {
        Some(chat::create_client(&config.chat)?)
    } else {
        None
    };

    let pool = db::connect(config).await?;
    let result = match load_transcript(&pool, video_id).await {
        Ok(transcript) => {
            build_context(&pool, client.as_deref(), &transcript, query, &params).await
        }
        Err(e) => Err(e),
    };
    pool.close().await;

    println!("{}", result?);
    Ok(())
}

#[derive(Serialize)]
struct ChunkRow<'a> {
    index: usize,
    chars: usize,
    score: Option<usize>,
    text: &'a str,
}

/// `tcx chunks` — list a transcript's chunks, ranked when a query is given.
pub async fn run_chunks(
    config: &Config,
    video_id: &str,
    query: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let params = config.context.params();
    let pool = db::connect(config).await?;
    let transcript = load_transcript(&pool, video_id).await;
    pool.close().await;
    let transcript = transcript?;

    let chunks = chunk_text(&transcript.body, params.chunk_size)?;

    let mut rows: Vec<ChunkRow<'_>> = match query {
        Some(q) => score_chunks(&chunks, q)
            .into_iter()
            .map(|sc| ChunkRow {
                index: sc.index,
                chars: sc.text.chars().count(),
                score: Some(sc.score),
                text: sc.text,
            })
            .collect(),
        None => chunks
            .iter()
            .enumerate()
            .map(|(index, text)| ChunkRow {
                index,
                chars: text.chars().count(),
                score: None,
                text: text.as_str(),
            })
            .collect(),
    };

    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} chunks (chunk_size {}, {} chars total)",
        chunks.len(),
        params.chunk_size,
        transcript.char_len()
    );
    for row in &rows {
        match row.score {
            Some(score) => println!("[chunk {}] score={} chars={}", row.index, score, row.chars),
            None => println!("[chunk {}] chars={}", row.index, row.chars),
        }
        println!("{}", row.text);
        println!();
    }

    Ok(())
}
