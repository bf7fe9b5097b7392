//! Transcript summaries: when to generate them and how they are cached.
//!
//! A summary is only worth its extra chat call when the transcript is too
//! long to send whole, i.e. when it exceeds the context threshold. Summaries
//! are cached against the transcript's content hash, so a re-ingested
//! transcript gets a fresh summary on next use.

use anyhow::{bail, Result};
use sqlx::SqlitePool;
use transcript_context_core::ContextParams;

use crate::chat::ChatClient;
use crate::models::{SummaryRecord, TranscriptRecord};
use crate::prompt;
use crate::store;

/// Return the summary to prefix the context with, generating and caching
/// one if the transcript needs reducing and none is cached.
///
/// Returns `None` for transcripts at or under the threshold.
pub async fn ensure_summary(
    pool: &SqlitePool,
    client: &dyn ChatClient,
    transcript: &TranscriptRecord,
    params: &ContextParams,
) -> Result<Option<String>> {
    if !params.exceeds_threshold(&transcript.body) {
        tracing::debug!(
            video_id = %transcript.video_id,
            chars = transcript.char_len(),
            threshold = params.threshold_chars,
            "transcript fits the context budget; no summary needed"
        );
        return Ok(None);
    }

    if let Some(cached) =
        store::get_valid_summary(pool, &transcript.video_id, &transcript.hash).await?
    {
        tracing::debug!(video_id = %transcript.video_id, model = %cached.model, "using cached summary");
        return Ok(Some(cached.summary));
    }

    let record = generate_summary(pool, client, transcript).await?;
    Ok(Some(record.summary))
}

/// Ask the chat client for a summary of the whole transcript and cache it.
pub async fn generate_summary(
    pool: &SqlitePool,
    client: &dyn ChatClient,
    transcript: &TranscriptRecord,
) -> Result<SummaryRecord> {
    if transcript.body.trim().is_empty() {
        bail!("transcript for '{}' is empty", transcript.video_id);
    }

    tracing::info!(
        video_id = %transcript.video_id,
        model = client.model_name(),
        chars = transcript.char_len(),
        "generating transcript summary"
    );

    let reply = client
        .complete(&prompt::summary_messages(&transcript.body))
        .await?;
    if reply.is_empty() {
        bail!("chat client returned an empty summary");
    }

    let record = SummaryRecord {
        video_id: transcript.video_id.clone(),
        transcript_hash: transcript.hash.clone(),
        model: client.model_name().to_string(),
        summary: reply,
        created_at: chrono::Utc::now().timestamp(),
    };
    store::put_summary(pool, &record).await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::migrate;
    use crate::models::{ChatMessage, Role};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CannedClient {
        reply: String,
        calls: AtomicUsize,
    }

    impl CannedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatClient for CannedClient {
        fn model_name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            assert_eq!(messages[0].role, Role::System);
            assert_eq!(messages[0].content, prompt::SUMMARY_INSTRUCTION);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    async fn setup(body: &str) -> (TempDir, SqlitePool, TranscriptRecord) {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("tcx.sqlite")).await.unwrap();
        migrate::migrate_pool(&pool).await.unwrap();
        store::upsert_transcript(&pool, "vid", None, "paste", body)
            .await
            .unwrap();
        let rec = store::get_transcript(&pool, "vid").await.unwrap().unwrap();
        (tmp, pool, rec)
    }

    #[tokio::test]
    async fn test_short_transcript_needs_no_summary() {
        let (_tmp, pool, rec) = setup("short and sweet").await;
        let client = CannedClient::new("unused");
        let got = ensure_summary(&pool, &client, &rec, &ContextParams::default())
            .await
            .unwrap();
        assert!(got.is_none());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_long_transcript_summary_generated_once() {
        let body = "garden ".repeat(50);
        let (_tmp, pool, rec) = setup(&body).await;
        let client = CannedClient::new("Video about gardening");
        let params = ContextParams::new(20, 2);

        let first = ensure_summary(&pool, &client, &rec, &params).await.unwrap();
        let second = ensure_summary(&pool, &client, &rec, &params).await.unwrap();

        assert_eq!(first.as_deref(), Some("Video about gardening"));
        assert_eq!(second, first);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        let cached = store::get_valid_summary(&pool, "vid", &rec.hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.model, "canned");
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_transcript() {
        let (_tmp, pool, rec) = setup("   ").await;
        let client = CannedClient::new("x");
        assert!(generate_summary(&pool, &client, &rec).await.is_err());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }
}
