// Serde types for per-user timeline files.
//
// Every field the extractor reads is optional: old dumps, quoted statuses
// and media-less tweets all omit parts of the structure, and a missing field
// just means the corresponding feature is absent.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::twitter::error::{ACCOUNT_NOT_FOUND, ACCOUNT_SUSPENDED};

/// One user's timeline file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineRecord {
    #[serde(default)]
    pub tweets: Vec<Tweet>,
    #[serde(default)]
    pub retweets: Vec<Tweet>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub status_count: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TimelineRecord {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read timeline {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse timeline {}", path.display()))
    }

    /// Whether the account is suspended, gone, or never posted.
    pub fn is_unavailable(&self) -> bool {
        let bad_code = self
            .error_code
            .as_deref()
            .is_some_and(|code| code == ACCOUNT_SUSPENDED || code == ACCOUNT_NOT_FOUND);
        bad_code || self.status_count == Some(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub quoted_status: Option<QuotedStatus>,
    #[serde(default)]
    pub entities: Option<Entities>,
    #[serde(default)]
    pub extended_entities: Option<ExtendedEntities>,
    #[serde(default)]
    pub user: Option<TweetUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotedStatus {
    #[serde(default)]
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub user_mentions: Vec<MentionEntity>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashtagEntity {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentionEntity {
    #[serde(default)]
    pub screen_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlEntity {
    #[serde(default)]
    pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type", default)]
    pub media_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweetUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
}
