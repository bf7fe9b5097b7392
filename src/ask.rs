//! Chat over a cached transcript: `tcx summarize` and `tcx ask`.

use anyhow::{bail, Result};
use sqlx::SqlitePool;

use crate::chat::{self, ChatClient};
use crate::config::Config;
use crate::db;
use crate::models::ChatMessage;
use crate::prompt;
use crate::retrieve;
use crate::store;
use crate::summary;

/// `tcx summarize` — generate (or show the cached) summary for a transcript.
pub async fn run_summarize(config: &Config, video_id: &str, force: bool) -> Result<()> {
    let client = chat::create_client(&config.chat)?;
    let pool = db::connect(config).await?;
    let result = summarize(&pool, client.as_ref(), video_id, force).await;
    pool.close().await;

    println!("{}", result?);
    Ok(())
}

async fn summarize(
    pool: &SqlitePool,
    client: &dyn ChatClient,
    video_id: &str,
    force: bool,
) -> Result<String> {
    let transcript = match store::get_transcript(pool, video_id).await? {
        Some(t) => t,
        None => bail!("transcript not found: {}", video_id),
    };

    if !force {
        if let Some(cached) = store::get_valid_summary(pool, video_id, &transcript.hash).await? {
            tracing::debug!(video_id, "summary already cached");
            return Ok(cached.summary);
        }
    }

    let record = summary::generate_summary(pool, client, &transcript).await?;
    Ok(record.summary)
}

/// `tcx ask` — answer a question about a video using its cached transcript.
pub async fn run_ask(
    config: &Config,
    video_id: &str,
    question: &str,
    history: &[ChatMessage],
    show_context: bool,
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let client = chat::create_client(&config.chat)?;
    let pool = db::connect(config).await?;
    let result = ask(config, &pool, client.as_ref(), video_id, question.trim(), history).await;
    pool.close().await;
    let (context, reply) = result?;

    if show_context {
        println!("--- Context ---");
        println!("{}", context);
        println!();
        println!("--- Answer ---");
    }
    println!("{}", reply);

    Ok(())
}

/// Assemble the context, send the conversation, and return `(context, reply)`.
pub async fn ask(
    config: &Config,
    pool: &SqlitePool,
    client: &dyn ChatClient,
    video_id: &str,
    question: &str,
    history: &[ChatMessage],
) -> Result<(String, String)> {
    let params = config.context.params();

    let context = match store::get_transcript(pool, video_id).await? {
        Some(transcript) => {
            retrieve::build_context(pool, Some(client), &transcript, question, &params).await?
        }
        None => {
            tracing::warn!(video_id, "no cached transcript; asking without context");
            String::new()
        }
    };

    let messages = prompt::build_messages(&context, history, question);
    tracing::info!(
        video_id,
        model = client.model_name(),
        messages = messages.len(),
        "sending chat completion"
    );

    let reply = client.complete(&messages).await?;
    Ok((context, reply))
}
