// Batch driver: split timeline files into fixed-size batches and write one
// feature file per batch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::features::extractor::BuzzerFeatures;
use crate::store;

/// Files per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Split `items` into consecutive chunks of at most `size` (a size of 0 is
/// treated as 1). Concatenating the chunks gives back `items`.
pub fn chunks<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

/// Every `*.json` file directly inside `dir`, sorted by path.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn batch_output_path(out_dir: &Path, batch: usize) -> PathBuf {
    out_dir.join(format!("buzzer_features_batch_{batch}.json"))
}

/// Result of one processed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub batch: usize,
    pub files: usize,
    pub rows: usize,
    pub unavailable: usize,
    pub output: PathBuf,
}

/// Extract features for the chosen batches (all when `only` is `None`) and
/// write each batch's rows as a JSON array.
pub fn run(
    extractor: &BuzzerFeatures<'_>,
    files: &[PathBuf],
    batch_size: usize,
    only: Option<usize>,
    out_dir: &Path,
) -> Result<Vec<BatchReport>> {
    let batches = chunks(files, batch_size);

    if let Some(n) = only {
        if n >= batches.len() {
            anyhow::bail!(
                "Batch {n} does not exist: {} files make {} batches of {batch_size}",
                files.len(),
                batches.len()
            );
        }
    }

    store::ensure_dirs(&[out_dir])?;

    let mut reports = Vec::new();
    for (index, batch) in batches.iter().enumerate() {
        if only.is_some_and(|n| n != index) {
            continue;
        }

        info!(batch = index, files = batch.len(), "Processing batch");
        let rows = extractor.extract_all(batch);
        let unavailable = rows.iter().filter(|r| r.username.is_none()).count();

        let output = batch_output_path(out_dir, index);
        store::write_json(&output, &rows)?;

        reports.push(BatchReport {
            batch: index,
            files: batch.len(),
            rows: rows.len(),
            unavailable,
            output,
        });
    }

    Ok(reports)
}
