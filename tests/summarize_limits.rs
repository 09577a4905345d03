// tests/summarize_limits.rs
//! Constraint behavior of the summary engine over realistic multi-post input.

use reddit_summarizer::{
    CancelToken, Comment, ContentModel, CoreError, StrategyTag, SummaryConstraint, SummaryEngine,
    SummaryResult,
};

fn post(id: &str, title: &str, body: &str, comments: &[(&str, i64)]) -> ContentModel {
    ContentModel {
        source_id: id.into(),
        title: title.into(),
        body: body.into(),
        comments: comments
            .iter()
            .map(|&(text, score)| Comment {
                author: "commenter".into(),
                text: text.into(),
                score,
            })
            .collect(),
        retrieved_via: StrategyTag::Mock,
        fetched_at: chrono::Utc::now(),
        author: "poster".into(),
        score: 100,
        subreddit: "rust".into(),
        permalink: String::new(),
    }
}

fn thread_pair() -> Vec<ContentModel> {
    vec![
        post(
            "a",
            "Why is my build so slow?",
            "Incremental compilation helps but linking dominates.\n\nSwitching the \
             linker cut our build time in half.",
            &[
                ("The linker is almost always the bottleneck for big workspaces.", 40),
                ("Try splitting crates before blaming the linker.", 22),
            ],
        ),
        post(
            "b",
            "Linker choices compared",
            "A comparison of linker options across platforms.",
            &[("Benchmarks without workspace sizes are meaningless.", 9)],
        ),
    ]
}

fn summarize(models: &[ContentModel], constraint: SummaryConstraint) -> SummaryResult {
    SummaryEngine::new()
        .summarize(models, &constraint, &CancelToken::new())
        .unwrap()
}

#[test]
fn word_limits_bound_output_for_a_range_of_limits() {
    let models = thread_pair();
    for w in [1u32, 3, 7, 15, 30, 60, 1000] {
        let out = summarize(&models, SummaryConstraint::MaxWords(w));
        assert!(
            out.text.split_whitespace().count() <= w as usize,
            "limit {w} violated"
        );
        assert_eq!(out.source_count, 2);
    }
}

#[test]
fn resummarizing_bounded_output_is_a_fixpoint() {
    let models = thread_pair();
    for w in [5u32, 20, 50] {
        let first = summarize(&models, SummaryConstraint::MaxWords(w));
        let wrapped = post("re", "", &first.text, &[]);
        let second = summarize(&[wrapped], SummaryConstraint::MaxWords(w));
        assert_eq!(second.text, first.text, "limit {w} not idempotent");
        assert!(!second.truncated, "fixpoint run must not need truncation");
    }
}

#[test]
fn paragraph_limit_selects_by_salience_but_emits_in_document_order() {
    let models = thread_pair();
    let full = summarize(&models, SummaryConstraint::MaxParagraphs(100));
    assert!(!full.truncated);
    let all_paragraphs: Vec<&str> = full.text.split("\n\n").collect();

    for n in 1..all_paragraphs.len() {
        let out = summarize(&models, SummaryConstraint::MaxParagraphs(n as u32));
        let chosen: Vec<&str> = out.text.split("\n\n").collect();
        assert_eq!(chosen.len(), n);
        assert!(out.truncated);

        // Relative order of the chosen paragraphs matches the full document.
        let positions: Vec<usize> = chosen
            .iter()
            .map(|p| {
                all_paragraphs
                    .iter()
                    .position(|q| q == p)
                    .expect("paragraph came from the candidate text")
            })
            .collect();
        let sorted = {
            let mut s = positions.clone();
            s.sort_unstable();
            s
        };
        assert_eq!(positions, sorted, "paragraph order broken at n={n}");
    }
}

#[test]
fn truncated_flag_reflects_dropped_content() {
    let models = thread_pair();
    let tight = summarize(&models, SummaryConstraint::MaxWords(4));
    assert!(tight.truncated);

    let loose = summarize(&models, SummaryConstraint::MaxWords(10_000));
    assert!(!loose.truncated);
}

#[test]
fn empty_input_is_an_error() {
    let err = SummaryEngine::new()
        .summarize(&[], &SummaryConstraint::MaxWords(10), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, CoreError::EmptyInput));
}
