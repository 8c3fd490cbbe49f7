// Social-political reference word list, read from one column of a CSV.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Header of the CSV column holding the reference words.
pub const LEXICON_COLUMN: &str = "social political";

#[derive(Debug, Clone)]
pub struct Lexicon {
    words: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon from words, dropping blanks. Fails if nothing is left.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            anyhow::bail!("Social-political lexicon is empty");
        }
        Ok(Self { words })
    }

    /// Load the `social political` column of a CSV file.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open lexicon {}", path.display()))?;

        let column = reader
            .headers()
            .context("Lexicon CSV has no header row")?
            .iter()
            .position(|h| h.trim() == LEXICON_COLUMN)
            .with_context(|| {
                format!(
                    "Lexicon {} has no '{LEXICON_COLUMN}' column",
                    path.display()
                )
            })?;

        let mut words = Vec::new();
        for row in reader.records() {
            let row = row.with_context(|| format!("Malformed row in {}", path.display()))?;
            if let Some(word) = row.get(column) {
                words.push(word.to_string());
            }
        }

        let lexicon = Self::from_words(words)?;
        info!(words = lexicon.len(), "Loaded social-political lexicon");
        Ok(lexicon)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
