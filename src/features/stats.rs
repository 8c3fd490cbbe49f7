// Per-user timeline statistics: entity counts and per-tweet ratios.
//
// Unlike the feature extractor, these counts come from the API's parsed
// `entities` rather than from the tweet text.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::extractor::username_from_path;
use super::timeline::TimelineRecord;
use crate::output::progress_bar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStats {
    pub screen_name: String,
    /// Hashtag entities across all tweets
    pub hashtags: usize,
    /// Mention entities across all tweets
    pub user_mentions: usize,
    /// Number of tweets
    pub id_tweet: usize,
    pub hashtag_per_tweets: f64,
    pub mention_per_tweets: f64,
}

pub fn compute(screen_name: &str, record: &TimelineRecord) -> TimelineStats {
    let (hashtags, user_mentions) = record
        .tweets
        .iter()
        .filter_map(|t| t.entities.as_ref())
        .fold((0, 0), |(h, m), e| {
            (h + e.hashtags.len(), m + e.user_mentions.len())
        });

    let id_tweet = record.tweets.len();
    let per_tweet = |count: usize| {
        if id_tweet == 0 {
            0.0
        } else {
            count as f64 / id_tweet as f64
        }
    };

    TimelineStats {
        screen_name: screen_name.to_string(),
        hashtags,
        user_mentions,
        id_tweet,
        hashtag_per_tweets: per_tweet(hashtags),
        mention_per_tweets: per_tweet(user_mentions),
    }
}

/// Compute stats for every readable timeline file, in order.
pub fn compute_all(paths: &[PathBuf]) -> Vec<TimelineStats> {
    let pb = progress_bar(paths.len(), "Stats");
    let mut rows = Vec::with_capacity(paths.len());

    for path in paths {
        let loaded = username_from_path(path)
            .ok_or_else(|| anyhow::anyhow!("no usable file name"))
            .and_then(|name| Ok((name, TimelineRecord::load(path)?)));
        match loaded {
            Ok((name, record)) => rows.push(compute(&name, &record)),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping timeline file"),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    rows
}
