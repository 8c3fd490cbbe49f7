// Media mix of a timeline: photo/video counts and outbound links.
//
// Tweets that quote another tweet are skipped entirely: their attachments
// usually belong to the quoted author, not the user being profiled.

use serde::Serialize;

use super::timeline::Tweet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaSummary {
    pub n_photo: usize,
    pub n_video: usize,
    pub content_url: Vec<String>,
}

/// The first attachment's media type and, for non-photo tweets, the first
/// expanded link. Both are `None` for quote tweets.
pub fn media_and_url(tweet: &Tweet) -> (Option<&str>, Option<&str>) {
    if tweet.quoted_status.is_some() {
        return (None, None);
    }

    let media_type = tweet
        .extended_entities
        .as_ref()
        .and_then(|ext| ext.media.first())
        .map(|media| media.media_type.as_str());

    let url = if media_type == Some("photo") {
        None
    } else {
        tweet
            .entities
            .as_ref()
            .and_then(|entities| entities.urls.first())
            .and_then(|url| url.expanded_url.as_deref())
    };

    (media_type, url)
}

/// Summarize media over a set of tweets. `None` for an empty timeline.
pub fn summarize_media(tweets: &[Tweet]) -> Option<MediaSummary> {
    if tweets.is_empty() {
        return None;
    }

    let mut summary = MediaSummary::default();
    for tweet in tweets {
        let (media_type, url) = media_and_url(tweet);
        match media_type {
            Some("photo") => summary.n_photo += 1,
            Some("video") => summary.n_video += 1,
            _ => {}
        }
        if let Some(url) = url {
            summary.content_url.push(url.to_string());
        }
    }
    Some(summary)
}
