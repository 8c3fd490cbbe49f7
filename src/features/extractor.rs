// Buzzer feature extraction: one timeline file in, one feature row out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::clean::TextCleaner;
use super::media::summarize_media;
use super::profile::ProfileDirectory;
use super::record::FeatureRecord;
use super::tags::{hashtag_usage, mention_usage};
use super::timeline::TimelineRecord;
use crate::output::progress_bar;
use crate::social_political::SocialPoliticalModel;

pub struct BuzzerFeatures<'a> {
    profiles: &'a ProfileDirectory,
    model: &'a SocialPoliticalModel,
    cleaner: Option<&'a TextCleaner>,
}

impl<'a> BuzzerFeatures<'a> {
    pub fn new(profiles: &'a ProfileDirectory, model: &'a SocialPoliticalModel) -> Self {
        Self {
            profiles,
            model,
            cleaner: None,
        }
    }

    /// Run the text-cleaning pass over `desc`, `tweets` and `quoted_tweets`.
    pub fn with_cleaner(mut self, cleaner: &'a TextCleaner) -> Self {
        self.cleaner = Some(cleaner);
        self
    }

    pub fn extract(&self, username: &str, record: &TimelineRecord) -> FeatureRecord {
        if record.is_unavailable() {
            debug!(username = username, "Account unavailable, emitting null record");
            return FeatureRecord::unavailable();
        }

        let (tweets, quoted_tweets) = separate_tweets(record);
        let hashtags = hashtag_usage(&tweets);
        let mentions = mention_usage(&tweets);
        let media = summarize_media(&record.tweets);

        let desc = resolve_description(username, record, self.profiles);
        let name = resolve_name(username, record, self.profiles);

        let is_name_social_political = name.as_deref().and_then(|name| {
            match self.model.predict(name) {
                Ok(label) => Some(u8::from(label)),
                Err(e) => {
                    warn!(username = username, error = %e, "Could not classify display name");
                    None
                }
            }
        });

        let n_tweet = tweets.len();
        let (desc, tweets, quoted_tweets) = match self.cleaner {
            Some(cleaner) => (
                cleaner.clean(&desc),
                cleaner.clean_all(&tweets),
                cleaner.clean_all(&quoted_tweets),
            ),
            None => (desc, tweets, quoted_tweets),
        };

        FeatureRecord {
            username: Some(username.to_string()),
            name,
            is_name_social_political,
            desc: Some(desc),
            tweets: Some(tweets),
            n_tweet: Some(n_tweet),
            quoted_tweets: Some(quoted_tweets),
            hashtag: Some(hashtags.tags),
            n_tweet_use_hashtag: Some(hashtags.tweets_using),
            ratio_tweets_use_hashtag: Some(hashtags.ratio),
            n_tweet_use_mention: Some(mentions.tweets_using),
            ratio_tweets_use_mention: Some(mentions.ratio),
            n_photo: media.as_ref().map(|m| m.n_photo),
            n_video: media.as_ref().map(|m| m.n_video),
            content_url: media.map(|m| m.content_url),
        }
    }

    /// Extract features from one timeline file; the username is the file stem.
    pub fn extract_file(&self, path: &Path) -> Result<FeatureRecord> {
        let username = username_from_path(path)
            .with_context(|| format!("No usable file name in {}", path.display()))?;
        let record = TimelineRecord::load(path)?;
        Ok(self.extract(&username, &record))
    }

    /// Extract every file in order, skipping (and logging) unreadable ones.
    pub fn extract_all(&self, paths: &[PathBuf]) -> Vec<FeatureRecord> {
        let pb = progress_bar(paths.len(), "Extracting");
        let mut rows = Vec::with_capacity(paths.len());

        for path in paths {
            match self.extract_file(path) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping timeline file"),
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        rows
    }
}

/// Independent tweet texts and the texts of the tweets they quote.
pub fn separate_tweets(record: &TimelineRecord) -> (Vec<String>, Vec<String>) {
    let tweets = record
        .tweets
        .iter()
        .filter_map(|t| t.full_text.clone())
        .collect();
    let quoted = record
        .tweets
        .iter()
        .filter_map(|t| t.quoted_status.as_ref()?.full_text.clone())
        .collect();
    (tweets, quoted)
}

/// Bio text: from the profile directory for plain screen names, from the
/// timeline file itself for `@`-prefixed ones. Empty when unknown.
pub fn resolve_description(
    username: &str,
    record: &TimelineRecord,
    profiles: &ProfileDirectory,
) -> String {
    let desc = if username.starts_with('@') {
        record.description.as_deref()
    } else {
        profiles.description(username)
    };
    desc.unwrap_or_default().to_string()
}

/// Display name: profile directory, then the author of the first tweet,
/// then the author of the first retweet.
pub fn resolve_name(
    username: &str,
    record: &TimelineRecord,
    profiles: &ProfileDirectory,
) -> Option<String> {
    let author_of = |tweets: &[super::timeline::Tweet]| {
        tweets
            .first()
            .and_then(|t| t.user.as_ref())
            .and_then(|u| u.name.clone())
    };

    profiles
        .name(username)
        .map(str::to_string)
        .or_else(|| author_of(&record.tweets))
        .or_else(|| author_of(&record.retweets))
}

pub fn username_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
