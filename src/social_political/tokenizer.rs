// Name tokenizer: splits screen names and display names into word-like
// tokens so each can be compared against the lexicon.

use std::sync::LazyLock;

use regex_lite::Regex;

/// A capital followed by a lowercase letter starts a new word.
static RE_CAMEL_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z][a-z])").unwrap());

/// A run of two or more capitals is its own word (acronyms, ALL-CAPS names).
static RE_CAPS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z]{2,})").unwrap());

/// Split a name into tokens.
///
/// Underscores separate pieces, one leading `@` is stripped from each piece,
/// and camel-case or ALL-CAPS runs are broken apart:
/// `@JokoWidodo_Official` -> `["Joko", "Widodo", "Official"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split('_')
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.strip_prefix('@').unwrap_or(piece))
        .flat_map(|piece| {
            let spaced = RE_CAMEL_WORD.replace_all(piece, " $1");
            let spaced = RE_CAPS_RUN.replace_all(&spaced, " $1");
            spaced
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
