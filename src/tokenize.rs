//! Keyword tokenizer used as a fallback/hybrid relevance signal when no
//! embedding is available for a candidate.
//!
//! Pipeline: split identifiers on camelCase / consecutive-uppercase
//! boundaries and on non-alphanumeric separators, lowercase, drop English
//! stop words, then Porter-stem so morphological variants collapse
//! ("enabling" and "enable" score as the same token).

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into",
    "through", "during", "before", "after", "above", "below", "between", "under", "over", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all", "each",
    "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same",
    "so", "than", "too", "very", "just", "and", "but", "if", "or", "because", "until", "while",
    "about", "against", "this", "that", "these", "those", "what", "which", "who", "whom", "i",
    "me", "my", "we", "our", "you", "your", "he", "him", "his", "she", "her", "it", "its", "they",
    "them", "their",
];

/// Tokenize free text into a set of stemmed keyword tokens.
///
/// Returns an empty set for empty or all-stop-word input. Order is
/// irrelevant and duplicates collapse; the output is only ever used for
/// set intersection.
pub fn token_set(text: &str) -> HashSet<String> {
    let stemmer = stemmer();
    let stop_set = stop_word_set();

    split_words(text)
        .into_iter()
        .map(|word| word.to_lowercase())
        .filter(|word| !word.is_empty() && !stop_set.contains(word.as_str()))
        .map(|word| stemmer.stem(&word).into_owned())
        .collect()
}

// This runs once per capability per resolution, so the stemmer tables and
// the stop-word set are built once per process.
fn stemmer() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

fn stop_word_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Overlap ratio between a query token set and a candidate token set:
/// |intersection| / |query tokens|. Empty query → 0.0.
pub fn overlap_ratio(query_tokens: &HashSet<String>, candidate_tokens: &HashSet<String>) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let intersection = query_tokens.intersection(candidate_tokens).count();
    intersection as f32 / query_tokens.len() as f32
}

/// Split text into raw words, breaking on non-alphanumeric separators and
/// on camelCase / uppercase-run boundaries ("JSONSchema" → "JSON", "Schema").
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();

    for segment in text.split(|c: char| !c.is_alphanumeric()) {
        if segment.is_empty() {
            continue;
        }

        let chars: Vec<char> = segment.chars().collect();
        let mut start = 0;

        for i in 1..chars.len() {
            let prev = chars[i - 1];
            let curr = chars[i];
            let next = chars.get(i + 1);

            // lower→upper transition: "findRecipe" splits before 'R'.
            let camel_boundary = prev.is_lowercase() && curr.is_uppercase();
            // end of an uppercase run followed by a lowercase tail:
            // "JSONSchema" splits before the 'S' of "Schema".
            let run_boundary = prev.is_uppercase()
                && curr.is_uppercase()
                && next.map(|c| c.is_lowercase()).unwrap_or(false);

            if camel_boundary || run_boundary {
                words.push(chars[start..i].iter().collect());
                start = i;
            }
        }

        words.push(chars[start..].iter().collect());
    }

    words
}
