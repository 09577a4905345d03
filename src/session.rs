// src/session.rs
//! Thin orchestrator between the excluded chat UI and the core: one user
//! turn = one synchronous `handle` call. Conversation history, widgets, and
//! process startup live on the UI side; this module only defines the
//! contract boundary.

use serde::Serialize;

use crate::cancel::CancelToken;
use crate::content::{is_post_url, ContentModel, RetrievalRequest};
use crate::error::{CoreError, StrategyAttempt};
use crate::retrieve::types::StrategyTag;
use crate::retrieve::RetrievalCoordinator;
use crate::summarize::{SummaryConstraint, SummaryEngine, SummaryResult};

const KEY_POINT_COUNT: usize = 15;

/// Per-turn settings the UI's sidebar produces.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Strategy order; `None` means the built-in default.
    pub scraper_preference: Option<Vec<StrategyTag>>,
    /// Subreddit to search; `None` searches site-wide.
    pub subreddit: Option<String>,
    pub post_limit: u32,
    pub max_words: Option<u32>,
    pub max_paragraphs: Option<u32>,
    /// Set when the user pasted a specific post URL instead of a question.
    pub post_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scraper_preference: None,
            subreddit: None,
            post_limit: 10,
            max_words: None,
            max_paragraphs: Some(3),
            post_url: None,
        }
    }
}

/// Card metadata for one retrieved post, rendered next to the summary.
#[derive(Debug, Clone, Serialize)]
pub struct PostRef {
    pub title: String,
    pub subreddit: String,
    pub score: i64,
    pub permalink: String,
}

/// Everything the UI needs to render one bot turn.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    /// Human-readable lead line ("I found 4 posts related to ...").
    pub message: String,
    pub summary: SummaryResult,
    pub key_points: Vec<String>,
    pub posts: Vec<PostRef>,
    /// Which strategy satisfied the request.
    pub via: StrategyTag,
    /// Fallbacks tried before `via`, in order.
    pub attempts: Vec<StrategyAttempt>,
}

pub struct ChatSession {
    coordinator: RetrievalCoordinator,
    engine: SummaryEngine,
}

impl ChatSession {
    pub fn new(coordinator: RetrievalCoordinator, engine: SummaryEngine) -> Self {
        Self {
            coordinator,
            engine,
        }
    }

    /// One user turn: utterance + sidebar config in, display payload out.
    /// Caller misuse (bad URL, bad constraint) fails fast; retrieval
    /// failures come back as a single exhausted error with the trail.
    pub async fn handle(
        &self,
        utterance: &str,
        config: &SessionConfig,
        cancel: &CancelToken,
    ) -> Result<ChatReply, CoreError> {
        let constraint = SummaryConstraint::from_limits(config.max_words, config.max_paragraphs)?;
        let request = build_request(utterance, config);
        let order = config
            .scraper_preference
            .clone()
            .unwrap_or_else(|| StrategyTag::DEFAULT_ORDER.to_vec());

        let outcome = self.coordinator.fetch(&request, &order, cancel).await?;
        tracing::debug!(
            via = %outcome.via,
            posts = outcome.models.len(),
            fallbacks = outcome.attempts.len(),
            "retrieval satisfied"
        );

        let summary = self.engine.summarize(&outcome.models, &constraint, cancel)?;
        let key_points = self.engine.key_points(&outcome.models, KEY_POINT_COUNT);

        let message = match &request {
            RetrievalRequest::Url { url } => {
                format!("I analyzed the post at {url}. Here's what I found:")
            }
            RetrievalRequest::Search { .. } => format!(
                "I found {} post{} related to '{}'. Here's what I found:",
                outcome.models.len(),
                if outcome.models.len() == 1 { "" } else { "s" },
                utterance.trim()
            ),
        };

        Ok(ChatReply {
            message,
            summary,
            key_points,
            posts: outcome.models.iter().map(post_ref).collect(),
            via: outcome.via,
            attempts: outcome.attempts,
        })
    }
}

fn post_ref(m: &ContentModel) -> PostRef {
    PostRef {
        title: m.title.clone(),
        subreddit: m.subreddit.clone(),
        score: m.score,
        permalink: m.permalink.clone(),
    }
}

/// A pasted post URL (explicit config field or URL-shaped utterance) wins
/// over search; everything else becomes a keyword search in the configured
/// subreddit, site-wide when none is set.
fn build_request(utterance: &str, config: &SessionConfig) -> RetrievalRequest {
    if let Some(url) = &config.post_url {
        return RetrievalRequest::url(url.clone());
    }
    let utterance = utterance.trim();
    if is_post_url(utterance) || utterance.starts_with("http") {
        return RetrievalRequest::url(utterance);
    }
    let subreddit = config
        .subreddit
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "all".to_string());
    let keyword = if utterance.is_empty() {
        None
    } else {
        Some(utterance.to_string())
    };
    RetrievalRequest::search(subreddit, keyword, config.post_limit)
}
