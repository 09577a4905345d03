// src/retrieve/wire.rs
//! Serde shapes for the platform's listing JSON.
//!
//! Both the OAuth API and the public `.json` endpoints speak the same
//! envelope: a `Listing` of `children`, each child a `data` payload. A post
//! URL with `.json` appended yields a two-element array — the post listing
//! followed by the comment listing.

use serde::Deserialize;

use crate::content::{Comment, ContentModel, RetrievalRequest};
use crate::error::StrategyError;
use crate::retrieve::types::StrategyTag;
use crate::retrieve::{normalize_block, normalize_inline};

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    #[serde(default)]
    pub kind: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
}

/// Parse a post listing (search/hot results).
pub fn parse_listing(body: &str, context: &str) -> Result<Vec<PostData>, StrategyError> {
    let listing: Listing = serde_json::from_str(body)
        .map_err(|e| StrategyError::Parse(format!("{context}: {e}")))?;
    let mut posts = Vec::with_capacity(listing.data.children.len());
    for child in listing.data.children {
        // Listings can interleave non-post nodes; skip anything that does
        // not deserialize as a post.
        if let Ok(post) = serde_json::from_value::<PostData>(child.data) {
            if !post.id.is_empty() {
                posts.push(post);
            }
        }
    }
    Ok(posts)
}

/// Parse a `<post-url>.json` thread: `[post listing, comment listing]`.
pub fn parse_thread(
    body: &str,
    context: &str,
) -> Result<(PostData, Vec<CommentData>), StrategyError> {
    let listings: Vec<Listing> = serde_json::from_str(body)
        .map_err(|e| StrategyError::Parse(format!("{context}: {e}")))?;
    let mut iter = listings.into_iter();
    let post = iter
        .next()
        .and_then(|l| l.data.children.into_iter().next())
        .and_then(|t| serde_json::from_value::<PostData>(t.data).ok())
        .filter(|p| !p.id.is_empty())
        .ok_or_else(|| StrategyError::Parse(format!("{context}: missing post node")))?;

    let mut comments = Vec::new();
    if let Some(listing) = iter.next() {
        for child in listing.data.children {
            // "more" stubs carry kind != "t1" and no body; drop them.
            if child.kind != "t1" {
                continue;
            }
            if let Ok(c) = serde_json::from_value::<CommentData>(child.data) {
                if !c.body.trim().is_empty() && c.body != "[deleted]" && c.body != "[removed]" {
                    comments.push(c);
                }
            }
        }
    }
    Ok((post, comments))
}

/// Convert a wire post + its comments into the normalized model.
pub fn into_model(post: PostData, comments: Vec<CommentData>, via: StrategyTag) -> ContentModel {
    let permalink = if post.permalink.starts_with("http") {
        post.permalink.clone()
    } else {
        format!("https://www.reddit.com{}", post.permalink)
    };
    ContentModel {
        source_id: post.id,
        title: normalize_inline(&post.title),
        body: normalize_block(&post.selftext),
        comments: comments
            .into_iter()
            .map(|c| Comment {
                author: c.author.unwrap_or_else(|| "[deleted]".into()),
                text: normalize_block(&c.body),
                score: c.score,
            })
            .filter(|c| !c.text.is_empty())
            .collect(),
        retrieved_via: via,
        fetched_at: chrono::Utc::now(),
        author: post.author.unwrap_or_else(|| "[deleted]".into()),
        score: post.score,
        subreddit: post.subreddit,
        permalink,
    }
}

/// Search/hot listing path for a request, relative to a JSON-speaking host.
pub fn listing_path(subreddit: &str, keyword: Option<&str>, limit: u32) -> String {
    match keyword {
        Some(q) => format!(
            "/r/{}/search.json?q={}&restrict_sr=1&sort=relevance&limit={}",
            subreddit,
            urlencode(q),
            limit
        ),
        None => format!("/r/{}/hot.json?limit={}", subreddit, limit),
    }
}

/// `.json` path for a direct post URL.
pub fn thread_json_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with(".json") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.json")
    }
}

/// Minimal percent-encoding for query terms. Keeps unreserved characters.
pub fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Convenience used by both JSON-shaped strategies.
pub fn request_paths(request: &RetrievalRequest) -> RequestShape<'_> {
    match request {
        RetrievalRequest::Search {
            subreddit,
            keyword,
            limit,
        } => RequestShape::Listing(listing_path(subreddit, keyword.as_deref(), *limit)),
        RetrievalRequest::Url { url } => RequestShape::Thread(url),
    }
}

pub enum RequestShape<'a> {
    Listing(String),
    Thread(&'a str),
}
