//! Normalized content model and retrieval requests.
//!
//! `ContentModel` is the single shape every strategy converges on, whether
//! the bytes came from the OAuth API, the public `.json` endpoints, scraped
//! markup, or the canned demo set. Instances are created fresh per request
//! and never mutated after construction.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::retrieve::types::StrategyTag;

pub const MAX_POST_LIMIT: u32 = 25;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub score: i64,
}

/// One retrieved post/thread, independent of which strategy produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentModel {
    /// Platform-assigned post id (opaque).
    pub source_id: String,
    /// May be empty for comment-only fetches.
    pub title: String,
    /// Post selftext, or the extracted page body.
    pub body: String,
    /// Insertion order = platform ranking at fetch time.
    pub comments: Vec<Comment>,
    pub retrieved_via: StrategyTag,
    pub fetched_at: DateTime<Utc>,
    // Card metadata the chat UI renders alongside the summary.
    pub author: String,
    pub score: i64,
    pub subreddit: String,
    pub permalink: String,
}

impl ContentModel {
    /// The success invariant: a model with neither body text nor comments is
    /// a failed extraction, not a degenerate success.
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty() || self.comments.iter().any(|c| !c.text.trim().is_empty())
    }
}

/// What the caller wants fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalRequest {
    /// Keyword search within a subreddit; `keyword: None` means the hot
    /// listing, as the platform has no "search for nothing" endpoint.
    Search {
        subreddit: String,
        keyword: Option<String>,
        limit: u32,
    },
    /// Fetch one specific post by URL.
    Url { url: String },
}

static POST_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://([a-z0-9-]+\.)?reddit\.com/r/[^/\s]+/comments/[A-Za-z0-9]+")
        .expect("valid post-url regex")
});

/// Does the string have the platform's post-URL shape?
pub fn is_post_url(s: &str) -> bool {
    POST_URL.is_match(s.trim())
}

impl RetrievalRequest {
    pub fn search(subreddit: impl Into<String>, keyword: Option<String>, limit: u32) -> Self {
        RetrievalRequest::Search {
            subreddit: subreddit.into(),
            keyword,
            limit,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        RetrievalRequest::Url { url: url.into() }
    }

    /// Reject malformed requests before any strategy is attempted.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            RetrievalRequest::Search {
                subreddit, limit, ..
            } => {
                if subreddit.trim().is_empty() {
                    return Err(CoreError::Config("subreddit must not be empty".into()));
                }
                if *limit == 0 {
                    return Err(CoreError::Config("post limit must be positive".into()));
                }
                if *limit > MAX_POST_LIMIT {
                    return Err(CoreError::Config(format!(
                        "post limit capped at {MAX_POST_LIMIT}"
                    )));
                }
                Ok(())
            }
            RetrievalRequest::Url { url } => {
                if is_post_url(url) {
                    Ok(())
                } else {
                    Err(CoreError::Config(format!(
                        "not a reddit post url: {url}"
                    )))
                }
            }
        }
    }
}
