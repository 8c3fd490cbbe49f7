// Lexical similarity between name tokens and lexicon words.
//
// Both features are distances: 0 means a token matched a lexicon word
// exactly. Jaccard works on the set of characters in each string; Levenshtein
// is the plain edit distance from `strsim`.

use std::collections::HashSet;

/// Jaccard distance between the character sets of two strings.
///
/// Two empty strings have distance 0.
pub fn jaccard_distance(a: &str, b: &str) -> f64 {
    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    1.0 - intersection as f64 / union as f64
}

/// Smallest Jaccard distance between any token and any lexicon word.
///
/// `None` when either side is empty.
pub fn min_jaccard(tokens: &[String], lexicon: &[String]) -> Option<f64> {
    tokens
        .iter()
        .flat_map(|token| lexicon.iter().map(move |word| jaccard_distance(token, word)))
        .min_by(|a, b| a.total_cmp(b))
}

/// Smallest Levenshtein distance between any token and any lexicon word.
///
/// `None` when either side is empty.
pub fn min_levenshtein(tokens: &[String], lexicon: &[String]) -> Option<usize> {
    tokens
        .iter()
        .flat_map(|token| lexicon.iter().map(move |word| strsim::levenshtein(token, word)))
        .min()
}
