// src/summarize/salience.rs
//! Frequency-based salience scoring.
//!
//! A coarse but deterministic substitute for learned summarization: terms
//! whose document-wide frequency sits strictly above the mean are "salient",
//! and a paragraph's score is its salient-term density. Ties are resolved by
//! original paragraph order, so the whole ranking is reproducible.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
        "by", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "must", "can", "this",
        "that", "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him",
        "her", "us", "them", "my", "your", "its", "our", "their", "as", "if", "so", "not",
        "no", "what", "all", "about", "into", "out", "up", "down", "from", "than", "then",
        "just", "very", "too", "also", "there", "here", "when", "where", "how", "why",
        "who", "which", "am", "more", "most", "some", "any", "one",
    ]
    .into_iter()
    .collect()
});

/// Alphanumeric tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

/// Scoring terms: tokens minus stopwords and single characters.
pub fn terms(s: &str) -> Vec<String> {
    tokenize(s)
        .filter(|t| t.len() >= 2 && !STOPWORDS.contains(t.as_str()))
        .collect()
}

/// Occurrence counts across all paragraphs' term lists.
pub fn term_frequencies(paragraph_terms: &[Vec<String>]) -> HashMap<&str, usize> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for terms in paragraph_terms {
        for t in terms {
            *freq.entry(t.as_str()).or_insert(0) += 1;
        }
    }
    freq
}

/// Terms occurring strictly more often than the mean frequency.
pub fn salient_terms<'a>(freq: &HashMap<&'a str, usize>) -> HashSet<&'a str> {
    if freq.is_empty() {
        return HashSet::new();
    }
    let total: usize = freq.values().sum();
    let mean = total as f64 / freq.len() as f64;
    freq.iter()
        .filter(|(_, &n)| (n as f64) > mean)
        .map(|(&t, _)| t)
        .collect()
}

/// Salient-term density of one paragraph's terms.
pub fn paragraph_score(terms: &[String], salient: &HashSet<&str>) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let hits = terms.iter().filter(|t| salient.contains(t.as_str())).count();
    hits as f64 / terms.len() as f64
}

/// Top-k terms by frequency; ties broken by first appearance in the text.
pub fn key_points(text: &str, k: usize) -> Vec<String> {
    let all = terms(text);
    let mut freq: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (i, t) in all.iter().enumerate() {
        *freq.entry(t.as_str()).or_insert(0) += 1;
        first_seen.entry(t.as_str()).or_insert(i);
    }
    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    ranked.sort_by_key(|&(t, n)| (std::cmp::Reverse(n), first_seen[t]));
    ranked
        .into_iter()
        .take(k)
        .map(|(t, _)| t.to_string())
        .collect()
}
