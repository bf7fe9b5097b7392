//! Idempotent schema migrations for the transcript cache.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Run all migrations against the configured database (`tcx init`).
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate_pool(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create the `transcripts` and `summaries` tables if they do not exist.
pub async fn migrate_pool(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcripts (
            video_id TEXT PRIMARY KEY,
            title TEXT,
            source TEXT NOT NULL DEFAULT 'paste',
            body TEXT NOT NULL,
            hash TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One summary per (video, transcript revision, model)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS summaries (
            video_id TEXT NOT NULL,
            transcript_hash TEXT NOT NULL,
            model TEXT NOT NULL,
            summary TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (video_id, transcript_hash, model),
            FOREIGN KEY (video_id) REFERENCES transcripts(video_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transcripts_updated_at ON transcripts(updated_at DESC)",
    )
    .execute(pool)
    .await?;

    tracing::debug!("schema migrations applied");
    Ok(())
}
