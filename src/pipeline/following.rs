// Following collection: who each user follows, plus those accounts' profiles.
//
// For every user, pages through `friends/list`, writes each followed
// account's raw profile to `profile/<screen_name>.json`, and writes
// `following/<user>.json` as `{user: [screen_name, ...]}`. Credential slots,
// retries and persistence work exactly as in timeline collection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::output::progress_bar;
use crate::store;
use crate::twitter::client::TimelineSource;
use crate::twitter::credentials::SlotPool;
use crate::twitter::error::TwitterError;
use crate::twitter::retry::{with_retry, RetryPolicy};

/// Where following output goes.
#[derive(Debug, Clone)]
pub struct FollowingDirs {
    pub profile: PathBuf,
    pub following: PathBuf,
}

impl FollowingDirs {
    pub fn under(root: &Path) -> Self {
        Self {
            profile: root.join("profile"),
            following: root.join("following"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FollowingSummary {
    pub users: usize,
    pub abandoned: usize,
    pub profiles_written: usize,
}

/// Followed accounts for one user, plus the error that stopped paging early.
#[derive(Debug)]
pub struct FollowingFetch {
    pub users: Vec<Value>,
    pub error: Option<TwitterError>,
}

pub async fn fetch_following(
    source: &dyn TimelineSource,
    screen_name: &str,
    retry: &RetryPolicy,
) -> FollowingFetch {
    let mut users = Vec::new();
    let mut cursor: i64 = -1;

    loop {
        let page = match with_retry(retry, screen_name, || source.friends(screen_name, cursor)).await
        {
            Ok(page) => page,
            Err(e) => {
                return FollowingFetch {
                    users,
                    error: Some(e),
                }
            }
        };

        let page_len = page.users.len();
        users.extend(page.users);
        debug!(
            screen_name = screen_name,
            page = page_len,
            total = users.len(),
            "Fetched following page"
        );

        if page.next_cursor == 0 || page_len == 0 {
            break;
        }
        cursor = page.next_cursor;
    }

    FollowingFetch { users, error: None }
}

/// Fetch and write one user's following list. Returns whether the fetch
/// finished cleanly and how many profiles were written.
pub async fn collect_user(
    source: &dyn TimelineSource,
    screen_name: &str,
    dirs: &FollowingDirs,
    retry: &RetryPolicy,
) -> (bool, usize) {
    let fetch = fetch_following(source, screen_name, retry).await;
    if let Some(e) = &fetch.error {
        warn!(
            screen_name = screen_name,
            error = %e,
            collected = fetch.users.len(),
            "Abandoning following fetch"
        );
    }

    let mut names = Vec::with_capacity(fetch.users.len());
    let mut written = 0;
    for user in &fetch.users {
        let Some(name) = user.get("screen_name").and_then(Value::as_str) else {
            continue;
        };
        names.push(name.to_string());
        match store::persist(&dirs.profile, name, user) {
            Ok(_) => written += 1,
            Err(e) => warn!(screen_name = name, error = %e, "Failed to write profile"),
        }
    }

    let listing: BTreeMap<&str, Vec<String>> = BTreeMap::from([(screen_name, names)]);
    if let Err(e) = store::persist(&dirs.following, screen_name, &listing) {
        warn!(screen_name = screen_name, error = %e, "Failed to write following list");
    }

    (fetch.error.is_none(), written)
}

/// Collect following lists for every user, `workers` at a time.
pub async fn run<S: TimelineSource>(
    pool: &SlotPool<S>,
    screen_names: &[String],
    dirs: &FollowingDirs,
    workers: usize,
    retry: &RetryPolicy,
) -> Result<FollowingSummary> {
    if pool.is_empty() {
        anyhow::bail!("No credentials available for collection");
    }
    store::ensure_dirs(&[&dirs.profile, &dirs.following])?;

    info!(users = screen_names.len(), workers = workers, "Collecting following lists");

    let pb = progress_bar(screen_names.len(), "Following");
    let mut summary = FollowingSummary::default();

    let mut results = stream::iter(screen_names.iter().map(|name| async move {
        let lease = pool.acquire().await;
        collect_user(lease.slot(), name, dirs, retry).await
    }))
    .buffer_unordered(workers.max(1));

    while let Some((clean, written)) = results.next().await {
        summary.users += 1;
        if !clean {
            summary.abandoned += 1;
        }
        summary.profiles_written += written;
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(summary)
}
