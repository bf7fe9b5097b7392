//! Transcript inspection: `tcx get`, `tcx list`, and `tcx forget`.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_get(config: &Config, video_id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let transcript = store::get_transcript(&pool, video_id).await?;

    let transcript = match transcript {
        Some(t) => t,
        None => {
            pool.close().await;
            bail!("transcript not found: {}", video_id);
        }
    };

    let summary = store::get_valid_summary(&pool, video_id, &transcript.hash).await?;
    pool.close().await;

    println!("--- Transcript ---");
    println!("video_id:   {}", transcript.video_id);
    println!(
        "title:      {}",
        transcript.title.as_deref().unwrap_or("(untitled)")
    );
    println!("source:     {}", transcript.source);
    println!("chars:      {}", transcript.char_len());
    println!("hash:       {}", transcript.hash);
    println!("created_at: {}", format_ts_iso(transcript.created_at));
    println!("updated_at: {}", format_ts_iso(transcript.updated_at));
    println!();

    if let Some(summary) = summary {
        println!("--- Summary ({}) ---", summary.model);
        println!("{}", summary.summary);
        println!();
    }

    println!("--- Body ---");
    println!("{}", transcript.body);

    Ok(())
}

pub async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let listings = store::list_transcripts(&pool).await?;
    pool.close().await;

    if listings.is_empty() {
        println!("No transcripts cached.");
        return Ok(());
    }

    println!(
        "{:<24} {:>8} {:<13} {:<8} {:<20} TITLE",
        "VIDEO", "CHARS", "SOURCE", "SUMMARY", "UPDATED"
    );
    for l in &listings {
        println!(
            "{:<24} {:>8} {:<13} {:<8} {:<20} {}",
            l.video_id,
            l.chars,
            l.source,
            if l.has_summary { "yes" } else { "no" },
            format_ts_iso(l.updated_at),
            l.title.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

pub async fn run_forget(config: &Config, video_id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let removed = store::delete_transcript(&pool, video_id).await?;
    pool.close().await;

    if !removed {
        bail!("transcript not found: {}", video_id);
    }

    tracing::info!(video_id, "forgot transcript");
    println!("forgot {}", video_id);
    Ok(())
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}
