// Credential loading and the slot pool that hands credentials to workers.
//
// Each key file holds one Twitter app's credentials. During collection every
// in-flight fetch owns exactly one slot; a slot goes FREE -> BUSY when a
// worker claims it and back to FREE when the lease is dropped, whether the
// fetch succeeded or not.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::time::Duration;
use tracing::{debug, info, warn};

/// How long a worker waits before re-checking for a free slot.
const SLOT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One set of Twitter API credentials, as stored in a key file.
///
/// Only app-only auth is used, so user access tokens in a key file are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub api_key: String,
    pub api_secret_key: String,
    /// Pre-issued app-only token. When absent, the client exchanges the
    /// key/secret pair for one on first use.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Load every `*.json` key file in `dir`, sorted by file name.
///
/// Files that fail to parse are skipped with a warning; an empty result is
/// an error since collection can't run without credentials.
pub fn load_credentials(dir: &Path) -> Result<Vec<Credential>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read key directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut credentials = Vec::with_capacity(paths.len());
    for path in &paths {
        let parsed = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| serde_json::from_str::<Credential>(&raw).map_err(Into::into));
        match parsed {
            Ok(cred) => credentials.push(cred),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable key file"),
        }
    }

    if credentials.is_empty() {
        anyhow::bail!("No usable key files found in {}", dir.display());
    }

    info!(count = credentials.len(), "Loaded API credentials");
    Ok(credentials)
}

/// A fixed set of slots, each usable by one worker at a time.
///
/// Claiming a slot is a compare-and-swap on its busy flag, so two workers
/// can never hold the same slot.
pub struct SlotPool<T> {
    slots: Vec<T>,
    busy: Vec<AtomicBool>,
}

impl<T> SlotPool<T> {
    pub fn new(slots: Vec<T>) -> Self {
        let busy = slots.iter().map(|_| AtomicBool::new(false)).collect();
        Self { slots, busy }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn free_count(&self) -> usize {
        self.busy
            .iter()
            .filter(|flag| !flag.load(Ordering::Acquire))
            .count()
    }

    /// Claim the lowest-numbered free slot, if any.
    pub fn try_acquire(&self) -> Option<SlotLease<'_, T>> {
        self.busy.iter().enumerate().find_map(|(index, flag)| {
            flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .ok()
                .map(|_| {
                    debug!(slot = index, "Slot claimed");
                    SlotLease { pool: self, index }
                })
        })
    }

    /// Wait until a slot is free and claim it.
    ///
    /// Never resolves on an empty pool.
    pub async fn acquire(&self) -> SlotLease<'_, T> {
        loop {
            if let Some(lease) = self.try_acquire() {
                return lease;
            }
            tokio::time::sleep(SLOT_POLL_INTERVAL).await;
        }
    }
}

/// Exclusive use of one slot. The slot is released on drop.
pub struct SlotLease<'a, T> {
    pool: &'a SlotPool<T>,
    index: usize,
}

impl<T> SlotLease<'_, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slot(&self) -> &T {
        &self.pool.slots[self.index]
    }
}

impl<T> Drop for SlotLease<'_, T> {
    fn drop(&mut self) {
        self.pool.busy[self.index].store(false, Ordering::Release);
        debug!(slot = self.index, "Slot released");
    }
}
