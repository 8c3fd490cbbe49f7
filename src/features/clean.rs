// Text cleaning for tweet and bio text.
//
// Steps, in order: strip links, strip non-ASCII, strip punctuation, expand
// slang to formal words, drop stop words, collapse whitespace, lowercase.
// Slang and stop words target Indonesian, the language of the corpus.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)\S+").unwrap());

/// Common Indonesian social-media abbreviations and their formal forms.
const DEFAULT_SLANG: &[(&str, &str)] = &[
    ("aja", "saja"),
    ("bgt", "banget"),
    ("blm", "belum"),
    ("dgn", "dengan"),
    ("dr", "dari"),
    ("ga", "tidak"),
    ("gak", "tidak"),
    ("gk", "tidak"),
    ("jd", "jadi"),
    ("klo", "kalau"),
    ("krn", "karena"),
    ("sdh", "sudah"),
    ("sy", "saya"),
    ("tdk", "tidak"),
    ("udah", "sudah"),
    ("utk", "untuk"),
    ("yg", "yang"),
];

pub struct TextCleaner {
    slang: HashMap<String, String>,
    stop_words: HashSet<String>,
}

impl TextCleaner {
    pub fn new(slang: HashMap<String, String>, stop_words: HashSet<String>) -> Self {
        Self { slang, stop_words }
    }

    /// Built-in slang table and the Indonesian stop-word list.
    pub fn indonesian() -> Self {
        let slang = DEFAULT_SLANG
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let stop_words = get(LANGUAGE::Indonesian).into_iter().collect();
        Self::new(slang, stop_words)
    }

    /// Extend the slang table from a JSON object of `{"slang": "formal"}`.
    pub fn with_slang_file(mut self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read slang dictionary {}", path.display()))?;
        let extra: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse slang dictionary {}", path.display()))?;
        self.slang.extend(
            extra
                .into_iter()
                .map(|(from, to)| (from.to_lowercase(), to)),
        );
        Ok(self)
    }

    pub fn clean(&self, text: &str) -> String {
        let without_links = RE_LINK.replace_all(text, " ");
        let ascii: String = without_links
            .chars()
            .filter(char::is_ascii)
            .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
            .collect();

        ascii
            .split_whitespace()
            .flat_map(|word| {
                let formal = self
                    .slang
                    .get(&word.to_lowercase())
                    .map(String::as_str)
                    .unwrap_or(word);
                formal.split_whitespace()
            })
            .filter(|word| !self.stop_words.contains(&word.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Clean each text and drop those left empty.
    pub fn clean_all(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .map(|text| self.clean(text))
            .filter(|text| !text.is_empty())
            .collect()
    }
}
