//! SQLite-backed transcript and summary cache.
//!
//! Transcripts are keyed by video ID. Each transcript carries the
//! SHA-256 of its body; summaries are stored against that hash so a
//! summary is only served while the transcript it was generated from is
//! still the cached one.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::models::{content_hash, SummaryRecord, TranscriptRecord};

/// What [`upsert_transcript`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// Same body; only the title or source changed.
    MetadataUpdated,
    Unchanged,
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UpsertOutcome::Inserted => "inserted",
            UpsertOutcome::Updated => "updated",
            UpsertOutcome::MetadataUpdated => "metadata updated",
            UpsertOutcome::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// Insert or replace the transcript for `video_id`.
///
/// Re-ingesting an identical body keeps the hash and summaries, but still
/// records a new title or source. A changed body drops every summary
/// generated from the previous revision.
pub async fn upsert_transcript(
    pool: &SqlitePool,
    video_id: &str,
    title: Option<&str>,
    source: &str,
    body: &str,
) -> Result<UpsertOutcome> {
    let hash = content_hash(body);
    let now = chrono::Utc::now().timestamp();

    let existing = sqlx::query("SELECT hash, title, source FROM transcripts WHERE video_id = ?")
        .bind(video_id)
        .fetch_optional(pool)
        .await?;

    let outcome = match existing {
        Some(row) if row.get::<String, _>("hash") == hash => {
            let old_title: Option<String> = row.get("title");
            let old_source: String = row.get("source");
            let title_changed = title.is_some() && title != old_title.as_deref();
            if !title_changed && old_source == source {
                return Ok(UpsertOutcome::Unchanged);
            }

            sqlx::query(
                "UPDATE transcripts SET title = COALESCE(?, title), source = ?, updated_at = ? WHERE video_id = ?",
            )
            .bind(title)
            .bind(source)
            .bind(now)
            .bind(video_id)
            .execute(pool)
            .await?;

            tracing::debug!(video_id, source, "transcript metadata updated");
            return Ok(UpsertOutcome::MetadataUpdated);
        }
        Some(_) => UpsertOutcome::Updated,
        None => UpsertOutcome::Inserted,
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO transcripts (video_id, title, source, body, hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(video_id) DO UPDATE SET
            title = COALESCE(excluded.title, transcripts.title),
            source = excluded.source,
            body = excluded.body,
            hash = excluded.hash,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(video_id)
    .bind(title)
    .bind(source)
    .bind(body)
    .bind(&hash)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if outcome == UpsertOutcome::Updated {
        let dropped = sqlx::query("DELETE FROM summaries WHERE video_id = ? AND transcript_hash != ?")
            .bind(video_id)
            .bind(&hash)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if dropped > 0 {
            tracing::info!(video_id, dropped, "dropped stale summaries");
        }
    }

    tx.commit().await?;

    tracing::debug!(video_id, %outcome, chars = body.chars().count(), "transcript cached");
    Ok(outcome)
}

pub async fn get_transcript(pool: &SqlitePool, video_id: &str) -> Result<Option<TranscriptRecord>> {
    let row = sqlx::query(
        "SELECT video_id, title, source, body, hash, created_at, updated_at FROM transcripts WHERE video_id = ?",
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| TranscriptRecord {
        video_id: row.get("video_id"),
        title: row.get("title"),
        source: row.get("source"),
        body: row.get("body"),
        hash: row.get("hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

/// Summary row for `tcx list`, without the transcript body.
#[derive(Debug, Clone)]
pub struct TranscriptListing {
    pub video_id: String,
    pub title: Option<String>,
    pub source: String,
    pub chars: i64,
    pub updated_at: i64,
    pub has_summary: bool,
}

/// List cached transcripts, most recently updated first.
pub async fn list_transcripts(pool: &SqlitePool) -> Result<Vec<TranscriptListing>> {
    let rows = sqlx::query(
        r#"
        SELECT t.video_id, t.title, t.source, LENGTH(t.body) AS chars, t.updated_at,
               EXISTS(SELECT 1 FROM summaries s
                      WHERE s.video_id = t.video_id AND s.transcript_hash = t.hash) AS has_summary
        FROM transcripts t
        ORDER BY t.updated_at DESC, t.video_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TranscriptListing {
            video_id: row.get("video_id"),
            title: row.get("title"),
            source: row.get("source"),
            chars: row.get("chars"),
            updated_at: row.get("updated_at"),
            has_summary: row.get::<i64, _>("has_summary") != 0,
        })
        .collect())
}

/// Remove a transcript and all of its summaries. Returns whether it existed.
pub async fn delete_transcript(pool: &SqlitePool, video_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM summaries WHERE video_id = ?")
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM transcripts WHERE video_id = ?")
        .bind(video_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

pub async fn put_summary(pool: &SqlitePool, record: &SummaryRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO summaries (video_id, transcript_hash, model, summary, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(video_id, transcript_hash, model) DO UPDATE SET
            summary = excluded.summary,
            created_at = excluded.created_at
        "#,
    )
    .bind(&record.video_id)
    .bind(&record.transcript_hash)
    .bind(&record.model)
    .bind(&record.summary)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// The newest summary generated from the transcript revision `transcript_hash`.
pub async fn get_valid_summary(
    pool: &SqlitePool,
    video_id: &str,
    transcript_hash: &str,
) -> Result<Option<SummaryRecord>> {
    let row = sqlx::query(
        r#"
        SELECT video_id, transcript_hash, model, summary, created_at FROM summaries
        WHERE video_id = ? AND transcript_hash = ?
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(video_id)
    .bind(transcript_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| SummaryRecord {
        video_id: row.get("video_id"),
        transcript_hash: row.get("transcript_hash"),
        model: row.get("model"),
        summary: row.get("summary"),
        created_at: row.get("created_at"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::migrate;
    use tempfile::TempDir;

    async fn test_pool() -> (TempDir, SqlitePool) {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("data/tcx.sqlite"))
            .await
            .unwrap();
        migrate::migrate_pool(&pool).await.unwrap();
        (tmp, pool)
    }

    fn summary(video_id: &str, hash: &str, text: &str) -> SummaryRecord {
        SummaryRecord {
            video_id: video_id.to_string(),
            transcript_hash: hash.to_string(),
            model: "gpt-4o-mini".to_string(),
            summary: text.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let (_tmp, pool) = test_pool().await;

        let outcome = upsert_transcript(&pool, "vid1", Some("Gardening"), "paste", "soil and water")
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted);

        let rec = get_transcript(&pool, "vid1").await.unwrap().unwrap();
        assert_eq!(rec.body, "soil and water");
        assert_eq!(rec.title.as_deref(), Some("Gardening"));
        assert_eq!(rec.hash, content_hash("soil and water"));

        assert!(get_transcript(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reingest_identical_is_unchanged() {
        let (_tmp, pool) = test_pool().await;
        upsert_transcript(&pool, "vid1", None, "paste", "same text")
            .await
            .unwrap();
        let outcome = upsert_transcript(&pool, "vid1", None, "paste", "same text")
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Unchanged);
        assert_eq!(list_transcripts(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reingest_same_body_updates_metadata() {
        let (_tmp, pool) = test_pool().await;
        upsert_transcript(&pool, "vid1", None, "paste", "same body")
            .await
            .unwrap();
        let hash = content_hash("same body");
        put_summary(&pool, &summary("vid1", &hash, "kept summary"))
            .await
            .unwrap();

        let outcome = upsert_transcript(&pool, "vid1", Some("Real Title"), "page", "same body")
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::MetadataUpdated);

        let rec = get_transcript(&pool, "vid1").await.unwrap().unwrap();
        assert_eq!(rec.title.as_deref(), Some("Real Title"));
        assert_eq!(rec.source, "page");
        assert_eq!(rec.hash, hash);
        let kept = get_valid_summary(&pool, "vid1", &hash).await.unwrap().unwrap();
        assert_eq!(kept.summary, "kept summary");

        // omitting the title keeps the stored one
        let outcome = upsert_transcript(&pool, "vid1", None, "page", "same body")
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Unchanged);
        let rec = get_transcript(&pool, "vid1").await.unwrap().unwrap();
        assert_eq!(rec.title.as_deref(), Some("Real Title"));
    }

    #[tokio::test]
    async fn test_changed_body_invalidates_summary() {
        let (_tmp, pool) = test_pool().await;
        upsert_transcript(&pool, "vid1", Some("T"), "paste", "first revision")
            .await
            .unwrap();
        let old_hash = content_hash("first revision");
        put_summary(&pool, &summary("vid1", &old_hash, "old summary"))
            .await
            .unwrap();
        assert!(get_valid_summary(&pool, "vid1", &old_hash)
            .await
            .unwrap()
            .is_some());

        let outcome = upsert_transcript(&pool, "vid1", None, "page", "second revision")
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let rec = get_transcript(&pool, "vid1").await.unwrap().unwrap();
        assert_eq!(rec.title.as_deref(), Some("T"));
        assert_eq!(rec.source, "page");
        assert!(get_valid_summary(&pool, "vid1", &old_hash)
            .await
            .unwrap()
            .is_none());
        assert!(get_valid_summary(&pool, "vid1", &rec.hash)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let (_tmp, pool) = test_pool().await;
        upsert_transcript(&pool, "a", None, "paste", "alpha").await.unwrap();
        upsert_transcript(&pool, "b", None, "paste", "beta").await.unwrap();
        put_summary(&pool, &summary("a", &content_hash("alpha"), "s"))
            .await
            .unwrap();

        let listed = list_transcripts(&pool).await.unwrap();
        assert_eq!(listed.len(), 2);
        let a = listed.iter().find(|l| l.video_id == "a").unwrap();
        assert!(a.has_summary);
        assert_eq!(a.chars, 5);

        assert!(delete_transcript(&pool, "a").await.unwrap());
        assert!(!delete_transcript(&pool, "a").await.unwrap());
        assert_eq!(list_transcripts(&pool).await.unwrap().len(), 1);
        assert!(get_valid_summary(&pool, "a", &content_hash("alpha"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_put_summary_overwrites() {
        let (_tmp, pool) = test_pool().await;
        upsert_transcript(&pool, "v", None, "paste", "body").await.unwrap();
        let hash = content_hash("body");
        put_summary(&pool, &summary("v", &hash, "one")).await.unwrap();
        put_summary(&pool, &summary("v", &hash, "two")).await.unwrap();
        let got = get_valid_summary(&pool, "v", &hash).await.unwrap().unwrap();
        assert_eq!(got.summary, "two");
    }
}
