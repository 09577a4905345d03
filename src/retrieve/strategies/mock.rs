// src/retrieve/strategies/mock.rs
//! Mock/demo strategy: deterministic canned posts, no network, never fails.
//!
//! Used as the unconditional final fallback when the caller's order enables
//! it, and as the whole retrieval layer in demo mode (no credentials, no
//! connectivity). Results are keyed by request shape: a known subreddit
//! yields its fixed posts, keyword terms filter the canned set, and URL mode
//! yields one canned thread.

use async_trait::async_trait;

use crate::content::{Comment, ContentModel, RetrievalRequest};
use crate::error::StrategyError;
use crate::retrieve::types::{RetrievalStrategy, StrategyTag};

#[derive(Default)]
pub struct MockStrategy;

struct CannedPost {
    id: &'static str,
    title: &'static str,
    body: &'static str,
    author: &'static str,
    score: i64,
    subreddit: &'static str,
    comments: &'static [(&'static str, &'static str, i64)],
}

const CANNED: &[CannedPost] = &[
    CannedPost {
        id: "demo1",
        title: "What are the best programming languages to learn in 2024?",
        body: "I want to start learning programming and wondering what languages \
               are most in demand.\n\nLooking for something with good job prospects \
               and a friendly community.",
        author: "programmer123",
        score: 1250,
        subreddit: "programming",
        comments: &[
            ("polyglot_dev", "Python for breadth, Rust for depth. Learn both eventually.", 312),
            ("hiring_mgr", "Whatever you pick, build real projects. Employers read repos, not resumes.", 188),
        ],
    },
    CannedPost {
        id: "demo2",
        title: "AI and Machine Learning trends for 2024",
        body: "Discussion about the latest developments in AI and ML.\n\nSmaller \
               specialized models seem to be winning over giant general ones this year.",
        author: "ai_enthusiast",
        score: 890,
        subreddit: "programming",
        comments: &[
            ("ml_skeptic", "Most production ML is still gradient boosting on tabular data.", 240),
        ],
    },
    CannedPost {
        id: "demo3",
        title: "Python vs JavaScript: Which should I learn first?",
        body: "Beginner asking for advice on choosing between Python and JavaScript.",
        author: "newbie_dev",
        score: 567,
        subreddit: "learnprogramming",
        comments: &[
            ("webdev_vet", "JavaScript if you want to ship things people can click on day one.", 95),
            ("data_person", "Python if you lean toward data or scripting. Both are fine starts.", 74),
        ],
    },
];

impl MockStrategy {
    pub fn new() -> Self {
        Self
    }
}

fn to_model(p: &CannedPost) -> ContentModel {
    ContentModel {
        source_id: p.id.to_string(),
        title: p.title.to_string(),
        body: p.body.to_string(),
        comments: p
            .comments
            .iter()
            .map(|&(author, text, score)| Comment {
                author: author.to_string(),
                text: text.to_string(),
                score,
            })
            .collect(),
        retrieved_via: StrategyTag::Mock,
        fetched_at: chrono::Utc::now(),
        author: p.author.to_string(),
        score: p.score,
        subreddit: p.subreddit.to_string(),
        permalink: format!("https://reddit.com/r/{}/comments/{}", p.subreddit, p.id),
    }
}

fn matches_keyword(p: &CannedPost, keyword: &str) -> bool {
    let title = p.title.to_ascii_lowercase();
    let body = p.body.to_ascii_lowercase();
    keyword
        .to_ascii_lowercase()
        .split_whitespace()
        .any(|term| title.contains(term) || body.contains(term))
}

#[async_trait]
impl RetrievalStrategy for MockStrategy {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<Vec<ContentModel>, StrategyError> {
        let models = match request {
            RetrievalRequest::Search {
                subreddit,
                keyword,
                limit,
            } => {
                let by_sub: Vec<&CannedPost> = if subreddit.eq_ignore_ascii_case("all") {
                    CANNED.iter().collect()
                } else {
                    let hits: Vec<&CannedPost> = CANNED
                        .iter()
                        .filter(|p| p.subreddit.eq_ignore_ascii_case(subreddit))
                        .collect();
                    // Unknown subreddits still get demo data.
                    if hits.is_empty() {
                        CANNED.iter().collect()
                    } else {
                        hits
                    }
                };
                let mut filtered: Vec<&CannedPost> = match keyword {
                    Some(q) => by_sub
                        .iter()
                        .copied()
                        .filter(|p| matches_keyword(p, q))
                        .collect(),
                    None => by_sub.clone(),
                };
                if filtered.is_empty() {
                    filtered = by_sub;
                }
                filtered
                    .into_iter()
                    .take(*limit as usize)
                    .map(to_model)
                    .collect()
            }
            RetrievalRequest::Url { .. } => vec![to_model(&CANNED[0])],
        };
        Ok(models)
    }

    fn tag(&self) -> StrategyTag {
        StrategyTag::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_subreddit_yields_its_fixed_posts() {
        let s = MockStrategy::new();
        let out = s
            .fetch(&RetrievalRequest::search("programming", None, 10))
            .await
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|m| m.subreddit == "programming"));
        assert!(out.iter().all(|m| m.has_content()));
    }

    #[tokio::test]
    async fn keyword_filter_falls_back_to_the_full_set() {
        let s = MockStrategy::new();
        let hit = s
            .fetch(&RetrievalRequest::search(
                "all",
                Some("javascript".into()),
                10,
            ))
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].source_id, "demo3");

        let miss = s
            .fetch(&RetrievalRequest::search(
                "all",
                Some("zebra xylophone".into()),
                10,
            ))
            .await
            .unwrap();
        assert_eq!(miss.len(), 3);
    }

    #[tokio::test]
    async fn url_mode_returns_one_canned_thread() {
        let s = MockStrategy::new();
        let out = s
            .fetch(&RetrievalRequest::url(
                "https://www.reddit.com/r/rust/comments/abc123/x/",
            ))
            .await
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out[0].comments.is_empty());
    }
}
