//! Data types shared across the cache, chat, and command layers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A cached video transcript.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptRecord {
    pub video_id: String,
    pub title: Option<String>,
    /// Where the text came from: `transcription`, `page`, or `paste`.
    pub source: String,
    pub body: String,
    /// SHA-256 of `body`, hex encoded.
    pub hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TranscriptRecord {
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }
}

/// A summary generated for one revision of a transcript.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    pub video_id: String,
    pub transcript_hash: String,
    pub model: String,
    pub summary: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!(
                "unknown role '{}': expected system, user, or assistant",
                other
            )),
        }
    }
}

/// One message in a chat-completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Hex SHA-256 of a transcript body, used to detect stale summaries.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
