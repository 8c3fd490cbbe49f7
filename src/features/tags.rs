// Hashtag and mention usage, read from tweet text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// Unicode-aware `\w`, so `#café` and `#日本` are whole tags.
static RE_HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// A mention must start the text or follow a non-word character, which
/// keeps the domain of `budi@mail.com` out.
static RE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w@])(@\w+)").unwrap());

pub fn hashtags_in(text: &str) -> Vec<String> {
    RE_HASHTAG
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn mentions_in(text: &str) -> Vec<String> {
    RE_MENTION
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// How a set of tweets uses one kind of tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagUsage {
    /// Every tag found, in tweet order
    pub tags: Vec<String>,
    /// Tweets containing at least one tag
    pub tweets_using: usize,
    /// `tweets_using / tweets.len()`, 0 when there are no tweets
    pub ratio: f64,
}

pub fn tag_usage(tweets: &[String], extract: fn(&str) -> Vec<String>) -> TagUsage {
    let mut usage = TagUsage::default();
    for tweet in tweets {
        let found = extract(tweet);
        if !found.is_empty() {
            usage.tweets_using += 1;
            usage.tags.extend(found);
        }
    }
    if usage.tweets_using > 0 {
        usage.ratio = usage.tweets_using as f64 / tweets.len() as f64;
    }
    usage
}

pub fn hashtag_usage(tweets: &[String]) -> TagUsage {
    tag_usage(tweets, hashtags_in)
}

pub fn mention_usage(tweets: &[String]) -> TagUsage {
    tag_usage(tweets, mentions_in)
}
