//! Transcript ingestion (`tcx ingest`).
//!
//! Reads a transcript from a file or stdin and caches it under a video
//! ID. Transcripts come from audio transcription, page scraping, or a
//! user paste; this command only stores the text.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;
use transcript_context_core::chunk_text;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_ingest(
    config: &Config,
    video_id: &str,
    file: Option<&Path>,
    title: Option<&str>,
    source: &str,
    dry_run: bool,
) -> Result<()> {
    if video_id.trim().is_empty() {
        bail!("video id must not be empty");
    }

    let body = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read transcript from stdin")?;
            buf
        }
    };

    if body.trim().is_empty() {
        bail!("transcript for '{}' is empty", video_id);
    }

    let params = config.context.params();
    let chunk_count = chunk_text(&body, params.chunk_size)?.len();
    let chars = body.chars().count();

    if dry_run {
        println!("ingest {} (dry-run)", video_id);
        println!("  chars: {}", chars);
        println!("  chunks: {}", chunk_count);
        println!("  needs reduction: {}", params.exceeds_threshold(&body));
        return Ok(());
    }

    let pool = db::connect(config).await?;
    let outcome = store::upsert_transcript(&pool, video_id, title, source, &body).await?;
    pool.close().await;

    tracing::info!(video_id, %outcome, chars, "ingested transcript");

    println!("ingest {}", video_id);
    println!("  chars: {}", chars);
    println!("  chunks: {}", chunk_count);
    println!("  needs reduction: {}", params.exceeds_threshold(&body));
    println!("  status: {}", outcome);
    println!("ok");

    Ok(())
}
