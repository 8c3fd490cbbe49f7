// Timeline collection: fetch recent tweets for many users in parallel.
//
// Each user's fetch claims one credential slot for its whole duration, so at
// most one request per credential is in flight. Results are written as one
// timeline file per user, split into tweets and retweets, with the account
// error code recorded when the API says the account is gone.

use std::path::Path;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::output::progress_bar;
use crate::store;
use crate::twitter::client::{TimelineSource, TIMELINE_PAGE_MAX};
use crate::twitter::credentials::SlotPool;
use crate::twitter::error::TwitterError;
use crate::twitter::retry::{with_retry, RetryPolicy};

/// Tweets fetched per user.
pub const DEFAULT_TIMELINE_LIMIT: usize = 300;

/// Concurrent fetches.
pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub limit: usize,
    pub workers: usize,
    pub retry: RetryPolicy,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TIMELINE_LIMIT,
            workers: DEFAULT_WORKERS,
            retry: RetryPolicy::default(),
        }
    }
}

/// Statuses gathered for one user, plus the error that stopped the fetch early.
#[derive(Debug)]
pub struct TimelineFetch {
    pub statuses: Vec<Value>,
    pub error: Option<TwitterError>,
}

/// The file written for each user.
#[derive(Debug, Serialize)]
pub struct TimelineFile {
    pub tweets: Vec<Value>,
    pub retweets: Vec<Value>,
    pub error_code: Option<String>,
    /// Unknown (`null`) when the API did not report it and the fetch failed
    /// for a reason other than the account being gone.
    pub status_count: Option<u64>,
    pub description: Option<String>,
}

impl TimelineFile {
    pub fn from_fetch(fetch: &TimelineFetch) -> Self {
        let (retweets, tweets): (Vec<Value>, Vec<Value>) = fetch
            .statuses
            .iter()
            .cloned()
            .partition(|status| status.get("retweeted_status").is_some());

        let error_code = fetch
            .error
            .as_ref()
            .and_then(TwitterError::account_error_code)
            .map(str::to_string);

        let author = fetch.statuses.first().and_then(|s| s.get("user"));
        let reported = author
            .and_then(|u| u.get("statuses_count"))
            .and_then(Value::as_u64);
        // An empty fetch means zero statuses only when nothing went wrong or
        // the account is known to be gone.
        let known_empty =
            fetch.statuses.is_empty() && (fetch.error.is_none() || error_code.is_some());
        let status_count = match reported {
            Some(count) => Some(count),
            None if known_empty => Some(0),
            None => None,
        };
        let description = author
            .and_then(|u| u.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            tweets,
            retweets,
            error_code,
            status_count,
            description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Every page fetched up to the limit or the end of the timeline
    Complete,
    /// The API reported the account suspended, locked or missing
    Unavailable,
    /// A terminal error or exhausted retries cut the fetch short
    Abandoned,
    /// The timeline could not be written to disk
    WriteFailed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectSummary {
    pub complete: usize,
    pub unavailable: usize,
    pub abandoned: usize,
    pub write_failed: usize,
    pub tweets: usize,
}

impl CollectSummary {
    fn record(&mut self, outcome: CollectOutcome, tweets: usize) {
        match outcome {
            CollectOutcome::Complete => self.complete += 1,
            CollectOutcome::Unavailable => self.unavailable += 1,
            CollectOutcome::Abandoned => self.abandoned += 1,
            CollectOutcome::WriteFailed => self.write_failed += 1,
        }
        self.tweets += tweets;
    }

    pub fn users(&self) -> usize {
        self.complete + self.unavailable + self.abandoned + self.write_failed
    }
}

/// Page backwards through a user's timeline until `limit` statuses are
/// collected, the timeline ends, or a request fails for good.
pub async fn fetch_timeline(
    source: &dyn TimelineSource,
    screen_name: &str,
    limit: usize,
    retry: &RetryPolicy,
) -> TimelineFetch {
    let mut statuses: Vec<Value> = Vec::new();
    let mut max_id: Option<u64> = None;

    while statuses.len() < limit {
        let count = (limit - statuses.len()).min(TIMELINE_PAGE_MAX);
        let page = match with_retry(retry, screen_name, || {
            source.user_timeline(screen_name, count, max_id)
        })
        .await
        {
            Ok(page) => page,
            Err(e) => {
                return TimelineFetch {
                    statuses,
                    error: Some(e),
                }
            }
        };

        if page.is_empty() {
            break;
        }

        // Next page starts just below the oldest ID seen so far.
        let oldest = page.iter().filter_map(|s| s.get("id").and_then(Value::as_u64)).min();
        let page_len = page.len();
        statuses.extend(page.into_iter().take(limit - statuses.len()));

        debug!(
            screen_name = screen_name,
            page = page_len,
            total = statuses.len(),
            "Fetched timeline page"
        );

        match oldest {
            Some(0) | None => break,
            Some(id) => max_id = Some(id - 1),
        }
    }

    TimelineFetch {
        statuses,
        error: None,
    }
}

/// Fetch one user's timeline and write it to `<out_dir>/<screen_name>.json`.
pub async fn collect_user(
    source: &dyn TimelineSource,
    screen_name: &str,
    out_dir: &Path,
    options: &CollectOptions,
) -> (CollectOutcome, usize) {
    let fetch = fetch_timeline(source, screen_name, options.limit, &options.retry).await;
    let file = TimelineFile::from_fetch(&fetch);
    let tweets = file.tweets.len() + file.retweets.len();

    let outcome = match &fetch.error {
        None => CollectOutcome::Complete,
        Some(_) if file.error_code.is_some() => CollectOutcome::Unavailable,
        Some(e) => {
            warn!(
                screen_name = screen_name,
                error = %e,
                collected = tweets,
                "Abandoning timeline fetch"
            );
            CollectOutcome::Abandoned
        }
    };

    match store::persist(out_dir, screen_name, &file) {
        Ok(persisted) => {
            debug!(path = %persisted.path().display(), "Timeline written");
            (outcome, tweets)
        }
        Err(e) => {
            warn!(screen_name = screen_name, error = %e, "Failed to write timeline");
            (CollectOutcome::WriteFailed, tweets)
        }
    }
}

/// Collect timelines for every user, `options.workers` at a time.
pub async fn run<S: TimelineSource>(
    pool: &SlotPool<S>,
    screen_names: &[String],
    out_dir: &Path,
    options: &CollectOptions,
) -> Result<CollectSummary> {
    if pool.is_empty() {
        anyhow::bail!("No credentials available for collection");
    }
    store::ensure_dirs(&[out_dir])?;

    info!(
        users = screen_names.len(),
        credentials = pool.len(),
        workers = options.workers,
        "Collecting timelines"
    );

    let pb = progress_bar(screen_names.len(), "Timelines");
    let mut summary = CollectSummary::default();

    let mut results = stream::iter(screen_names.iter().map(|name| async move {
        let lease = pool.acquire().await;
        debug!(screen_name = name.as_str(), slot = lease.index(), "Dispatching fetch");
        collect_user(lease.slot(), name, out_dir, options).await
    }))
    .buffer_unordered(options.workers.max(1));

    while let Some((outcome, tweets)) = results.next().await {
        summary.record(outcome, tweets);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        complete = summary.complete,
        unavailable = summary.unavailable,
        abandoned = summary.abandoned,
        "Timeline collection finished"
    );
    Ok(summary)
}
