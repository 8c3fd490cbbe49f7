use serde::{Deserialize, Serialize};

/// Per-user feature row.
///
/// Every field is `None` (serialized as `null`) for accounts that are
/// suspended, not found, or have never posted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub username: Option<String>,
    pub name: Option<String>,
    pub is_name_social_political: Option<u8>,
    pub desc: Option<String>,
    pub tweets: Option<Vec<String>>,
    pub n_tweet: Option<usize>,
    pub quoted_tweets: Option<Vec<String>>,
    pub hashtag: Option<Vec<String>>,
    pub n_tweet_use_hashtag: Option<usize>,
    pub ratio_tweets_use_hashtag: Option<f64>,
    pub n_tweet_use_mention: Option<usize>,
    pub ratio_tweets_use_mention: Option<f64>,
    pub n_photo: Option<usize>,
    pub n_video: Option<usize>,
    pub content_url: Option<Vec<String>>,
}

impl FeatureRecord {
    /// The all-null row written for unavailable accounts.
    pub fn unavailable() -> Self {
        Self::default()
    }
}
