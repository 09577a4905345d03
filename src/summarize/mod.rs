// src/summarize/mod.rs
//! Length-constrained extractive summarization.
//!
//! The candidate text is every model's title, body paragraphs, and ranked
//! comment text, concatenated in input order with paragraph boundaries
//! preserved. Paragraphs are ranked by frequency-based salience, selected
//! under the constraint, then **re-ordered back into document order** so the
//! summary reads coherently instead of by score.

pub mod salience;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::content::ContentModel;
use crate::error::CoreError;

/// Exactly one bound. Constructed via `from_limits`, which rejects the
/// both-set and neither-set shapes the UI could produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryConstraint {
    MaxWords(u32),
    MaxParagraphs(u32),
}

impl SummaryConstraint {
    pub fn from_limits(
        max_words: Option<u32>,
        max_paragraphs: Option<u32>,
    ) -> Result<Self, CoreError> {
        match (max_words, max_paragraphs) {
            (Some(_), Some(_)) => Err(CoreError::Config(
                "set either a word limit or a paragraph limit, not both".into(),
            )),
            (None, None) => Err(CoreError::Config(
                "a word limit or a paragraph limit is required".into(),
            )),
            (Some(0), None) | (None, Some(0)) => {
                Err(CoreError::Config("length limit must be positive".into()))
            }
            (Some(w), None) => Ok(SummaryConstraint::MaxWords(w)),
            (None, Some(p)) => Ok(SummaryConstraint::MaxParagraphs(p)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: String,
    /// The constraint forced dropping or cutting content.
    pub truncated: bool,
    pub source_count: usize,
}

static RE_PARA_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

fn split_paragraphs(s: &str) -> impl Iterator<Item = String> + '_ {
    RE_PARA_SPLIT
        .split(s)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Candidate paragraphs in document order: per model, title then body then
/// comment text.
fn candidate_paragraphs(models: &[ContentModel]) -> Vec<String> {
    let mut out = Vec::new();
    for m in models {
        if !m.title.trim().is_empty() {
            out.push(m.title.trim().to_string());
        }
        out.extend(split_paragraphs(&m.body));
        for c in &m.comments {
            out.extend(split_paragraphs(&c.text));
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct SummaryEngine;

impl SummaryEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(
        &self,
        models: &[ContentModel],
        constraint: &SummaryConstraint,
        cancel: &CancelToken,
    ) -> Result<SummaryResult, CoreError> {
        if models.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        let paragraphs = candidate_paragraphs(models);
        if paragraphs.is_empty() {
            return Err(CoreError::EmptyInput);
        }

        // Score every paragraph; a large thread can make this the slow part,
        // so cancellation is checked per step.
        let mut paragraph_terms = Vec::with_capacity(paragraphs.len());
        for p in &paragraphs {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            paragraph_terms.push(salience::terms(p));
        }
        let freq = salience::term_frequencies(&paragraph_terms);
        let salient = salience::salient_terms(&freq);

        let mut scores = Vec::with_capacity(paragraphs.len());
        for terms in &paragraph_terms {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            scores.push(salience::paragraph_score(terms, &salient));
        }

        // Stable sort: equal scores keep document order.
        let mut ranked: Vec<usize> = (0..paragraphs.len()).collect();
        ranked.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let (mut picked, truncated) = match *constraint {
            SummaryConstraint::MaxParagraphs(n) => {
                let n = n as usize;
                let picked: Vec<(usize, String)> = ranked
                    .iter()
                    .take(n)
                    .map(|&i| (i, paragraphs[i].clone()))
                    .collect();
                let truncated = paragraphs.len() > n;
                (picked, truncated)
            }
            SummaryConstraint::MaxWords(w) => select_by_words(&ranked, &paragraphs, w as usize),
        };

        // Back into document order before joining.
        picked.sort_by_key(|&(i, _)| i);
        let text = picked
            .into_iter()
            .map(|(_, p)| p)
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(SummaryResult {
            text,
            truncated,
            source_count: models.len(),
        })
    }

    /// Top-k recurring terms across the models, for the UI's key-points row.
    pub fn key_points(&self, models: &[ContentModel], k: usize) -> Vec<String> {
        let text = candidate_paragraphs(models).join("\n");
        salience::key_points(&text, k)
    }
}

/// Walk salience order accumulating word counts; include paragraphs whole
/// while they fit, word-truncate the first that does not, drop the rest.
fn select_by_words(
    ranked: &[usize],
    paragraphs: &[String],
    limit: usize,
) -> (Vec<(usize, String)>, bool) {
    let mut remaining = limit;
    let mut picked: Vec<(usize, String)> = Vec::new();
    let mut truncated = false;

    for &i in ranked {
        if remaining == 0 {
            truncated = true;
            break;
        }
        let words: Vec<&str> = paragraphs[i].split_whitespace().collect();
        if words.len() <= remaining {
            picked.push((i, paragraphs[i].clone()));
            remaining -= words.len();
        } else {
            picked.push((i, words[..remaining].join(" ")));
            truncated = true;
            break;
        }
    }
    (picked, truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::types::StrategyTag;

    fn model(title: &str, body: &str, comments: &[&str]) -> ContentModel {
        ContentModel {
            source_id: "t".into(),
            title: title.into(),
            body: body.into(),
            comments: comments
                .iter()
                .map(|&c| crate::content::Comment {
                    author: "a".into(),
                    text: c.into(),
                    score: 1,
                })
                .collect(),
            retrieved_via: StrategyTag::Mock,
            fetched_at: chrono::Utc::now(),
            author: "a".into(),
            score: 1,
            subreddit: "test".into(),
            permalink: String::new(),
        }
    }

    #[test]
    fn constraint_rejects_both_neither_and_zero() {
        assert!(SummaryConstraint::from_limits(Some(10), Some(2)).is_err());
        assert!(SummaryConstraint::from_limits(None, None).is_err());
        assert!(SummaryConstraint::from_limits(Some(0), None).is_err());
        assert_eq!(
            SummaryConstraint::from_limits(None, Some(3)).unwrap(),
            SummaryConstraint::MaxParagraphs(3)
        );
    }

    #[test]
    fn empty_models_fail_fast() {
        let engine = SummaryEngine::new();
        let err = engine
            .summarize(&[], &SummaryConstraint::MaxWords(10), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyInput));
    }

    #[test]
    fn cancelled_token_stops_scoring() {
        let engine = SummaryEngine::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let m = model("t", "some body text", &[]);
        let err = engine
            .summarize(&[m], &SummaryConstraint::MaxWords(10), &cancel)
            .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[test]
    fn salient_paragraph_wins_under_paragraph_limit() {
        // Body split as three one-sentence paragraphs; "P2" is the only
        // paragraph term repeated elsewhere (in a comment).
        let m = model(
            "",
            "P1 sentence.\n\nP2 sentence.\n\nP3 sentence.",
            &["totally p2 moment"],
        );
        let out = SummaryEngine::new()
            .summarize(
                &[m],
                &SummaryConstraint::MaxParagraphs(1),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(out.text, "P2 sentence.");
        assert!(out.truncated);
        assert_eq!(out.source_count, 1);
    }

    #[test]
    fn word_limit_is_honored_and_idempotent() {
        let m = model(
            "Rust questions",
            "First paragraph about rust tooling and compilers.\n\nSecond paragraph \
             about rust lifetimes explained with examples.\n\nThird paragraph on \
             unrelated gardening topics.",
            &["rust compilers are great", "lifetimes in rust confused me"],
        );
        let engine = SummaryEngine::new();
        for w in [1u32, 5, 12, 40, 500] {
            let out = engine
                .summarize(&[m.clone()], &SummaryConstraint::MaxWords(w), &CancelToken::new())
                .unwrap();
            let count = out.text.split_whitespace().count();
            assert!(count <= w as usize, "w={w} produced {count} words");

            // Re-summarizing the bounded output with the same limit is a fixpoint.
            let again = engine
                .summarize(
                    &[model("", &out.text, &[])],
                    &SummaryConstraint::MaxWords(w),
                    &CancelToken::new(),
                )
                .unwrap();
            assert_eq!(again.text, out.text, "not idempotent at w={w}");
        }
    }

    #[test]
    fn emitted_paragraphs_keep_document_order() {
        let m = model(
            "",
            "alpha alpha alpha first.\n\nfiller one here.\n\nalpha alpha last.",
            &[],
        );
        let out = SummaryEngine::new()
            .summarize(
                &[m],
                &SummaryConstraint::MaxParagraphs(2),
                &CancelToken::new(),
            )
            .unwrap();
        // Both alpha-heavy paragraphs selected, in original order.
        let paras: Vec<&str> = out.text.split("\n\n").collect();
        assert_eq!(paras.len(), 2);
        assert!(paras[0].ends_with("first."));
        assert!(paras[1].ends_with("last."));
        assert!(out.truncated);
    }

    #[test]
    fn no_truncation_when_everything_fits() {
        let m = model("Title here", "only one short paragraph", &[]);
        let out = SummaryEngine::new()
            .summarize(
                &[m],
                &SummaryConstraint::MaxParagraphs(10),
                &CancelToken::new(),
            )
            .unwrap();
        assert!(!out.truncated);
        assert_eq!(out.text, "Title here\n\nonly one short paragraph");
    }
}
