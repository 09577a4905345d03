// src/retrieve/strategies/html.rs
//! HTML-scrape strategy: structural extraction from old-reddit markup.
//!
//! This is the most fragile variant — the platform can change its markup
//! silently. The contract is therefore lenient: partial extraction (a post
//! with comments but no body, or vice versa) is fine, and only a page with
//! none of the expected anchors at all is a parse failure. Nothing in here
//! may panic on unexpected markup.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RetrieverSettings;
use crate::content::{Comment, ContentModel, RetrievalRequest};
use crate::error::StrategyError;
use crate::retrieve::strategies::{build_client, get_checked};
use crate::retrieve::types::{RetrievalStrategy, StrategyTag};
use crate::retrieve::{normalize_block, normalize_inline};

const OLD_HOST: &str = "https://old.reddit.com";

// Anchors into old-reddit markup. Kept deliberately loose: attribute order
// varies between listing kinds.
static RE_THING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div[^>]*class="[^"]*\bthing\b[^"]*"[^>]*>"#).unwrap());
static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a[^>]*class="[^"]*\btitle\b[^"]*"[^>]*>(.*?)</a>"#).unwrap());
static RE_MD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div[^>]*class="[^"]*\bmd\b[^"]*"[^>]*>(.*?)</div>"#).unwrap());
static RE_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)class="score[^"]*"[^>]*>\s*([0-9][0-9,.km]*)"#).unwrap());
static RE_FULLNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-fullname="t3_([A-Za-z0-9]+)""#).unwrap());
static RE_PERMALINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-permalink="([^"]+)""#).unwrap());
static RE_SUBREDDIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-subreddit="([^"]+)""#).unwrap());
static RE_AUTHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"data-author="([^"]+)""#).unwrap());
static RE_BR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<br\s*/?>|</p>|</li>").unwrap());

pub struct HtmlScrapeStrategy {
    mode: Mode,
}

enum Mode {
    Http { client: reqwest::Client },
    Fixture(String),
}

impl HtmlScrapeStrategy {
    pub fn new(settings: &RetrieverSettings) -> Self {
        Self {
            mode: Mode::Http {
                client: build_client(settings),
            },
        }
    }

    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    async fn fetch_page(&self, request: &RetrievalRequest) -> Result<String, StrategyError> {
        match &self.mode {
            Mode::Fixture(body) => Ok(body.clone()),
            Mode::Http { client } => {
                let url = page_url(request);
                get_checked(client, &url, "old-reddit page").await
            }
        }
    }
}

fn page_url(request: &RetrievalRequest) -> String {
    match request {
        RetrievalRequest::Search {
            subreddit,
            keyword,
            limit,
        } => match keyword {
            Some(q) => format!(
                "{OLD_HOST}/r/{subreddit}/search?q={}&restrict_sr=on&sort=relevance&limit={limit}",
                crate::retrieve::wire::urlencode(q)
            ),
            None => format!("{OLD_HOST}/r/{subreddit}/?limit={limit}"),
        },
        // Same page, older markup: rewrite whatever host the caller used.
        RetrievalRequest::Url { url } => {
            let path_start = url.find("/r/").unwrap_or(0);
            format!("{OLD_HOST}{}", &url[path_start..])
        }
    }
}

/// Markup block -> paragraphs: turn break-ish tags into newlines before the
/// generic tag stripping so paragraph boundaries survive normalization.
fn markup_to_block(fragment: &str) -> String {
    let with_breaks = RE_BR.replace_all(fragment, "\n\n");
    normalize_block(&with_breaks)
}

fn extract_listing(html: &str, fallback_subreddit: &str) -> Result<Vec<ContentModel>, StrategyError> {
    // Slice the page into per-post blocks at each `thing` container.
    let starts: Vec<usize> = RE_THING.find_iter(html).map(|m| m.start()).collect();
    if starts.is_empty() {
        return Err(StrategyError::Parse("no post containers in markup".into()));
    }

    let mut models = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(html.len());
        let block = &html[start..end];

        let Some(title) = RE_TITLE
            .captures(block)
            .map(|c| normalize_inline(&c[1]))
            .filter(|t| !t.is_empty())
        else {
            continue;
        };

        // Self posts embed their text in an expando `md` block; link posts
        // have none and are dropped (nothing to summarize).
        let body = RE_MD
            .captures(block)
            .map(|c| markup_to_block(&c[1]))
            .unwrap_or_default();
        if body.is_empty() {
            continue;
        }

        let permalink = RE_PERMALINK
            .captures(block)
            .map(|c| format!("{OLD_HOST}{}", &c[1]))
            .unwrap_or_default();
        models.push(ContentModel {
            source_id: RE_FULLNAME
                .captures(block)
                .map(|c| c[1].to_string())
                .unwrap_or_default(),
            title,
            body,
            comments: Vec::new(),
            retrieved_via: StrategyTag::HtmlScrape,
            fetched_at: chrono::Utc::now(),
            author: RE_AUTHOR
                .captures(block)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| "[web_scraped]".into()),
            score: parse_score(block),
            subreddit: RE_SUBREDDIT
                .captures(block)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| fallback_subreddit.to_string()),
            permalink,
        })
    }
    Ok(models)
}

fn extract_thread(html: &str, url: &str) -> Result<Vec<ContentModel>, StrategyError> {
    let title = RE_TITLE
        .captures(html)
        .map(|c| normalize_inline(&c[1]))
        .unwrap_or_default();

    // Everything before the comment area belongs to the post; everything
    // after it is ranked comments. Missing comment area means a comments-
    // disabled or truncated page — body-only extraction is still fine.
    let split_at = html.find("commentarea").unwrap_or(html.len());
    let (post_part, comment_part) = html.split_at(split_at);

    let body = RE_MD
        .captures(post_part)
        .map(|c| markup_to_block(&c[1]))
        .unwrap_or_default();

    let comments: Vec<Comment> = RE_MD
        .captures_iter(comment_part)
        .map(|c| Comment {
            author: "[web_scraped]".into(),
            text: markup_to_block(&c[1]),
            score: 0,
        })
        .filter(|c| !c.text.is_empty())
        .collect();

    if title.is_empty() && body.is_empty() && comments.is_empty() {
        return Err(StrategyError::Parse("no recognizable anchors in markup".into()));
    }

    Ok(vec![ContentModel {
        source_id: RE_FULLNAME
            .captures(html)
            .map(|c| c[1].to_string())
            .unwrap_or_default(),
        title,
        body,
        comments,
        retrieved_via: StrategyTag::HtmlScrape,
        fetched_at: chrono::Utc::now(),
        author: RE_AUTHOR
            .captures(post_part)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "[web_scraped]".into()),
        score: parse_score(post_part),
        subreddit: subreddit_from_url(url),
        permalink: url.to_string(),
    }])
}

fn parse_score(block: &str) -> i64 {
    RE_SCORE
        .captures(block)
        .and_then(|c| c[1].replace(',', "").parse::<i64>().ok())
        .unwrap_or(0)
}

fn subreddit_from_url(url: &str) -> String {
    url.split("/r/")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("unknown")
        .to_string()
}

#[async_trait]
impl RetrievalStrategy for HtmlScrapeStrategy {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<Vec<ContentModel>, StrategyError> {
        let html = self.fetch_page(request).await?;
        match request {
            RetrievalRequest::Search {
                subreddit, limit, ..
            } => {
                let mut models = extract_listing(&html, subreddit)?;
                models.truncate(*limit as usize);
                Ok(models)
            }
            RetrievalRequest::Url { url } => extract_thread(&html, url),
        }
    }

    fn tag(&self) -> StrategyTag {
        StrategyTag::HtmlScrape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subreddit_comes_out_of_the_url() {
        assert_eq!(
            subreddit_from_url("https://old.reddit.com/r/rust/comments/abc/x/"),
            "rust"
        );
        assert_eq!(subreddit_from_url("https://example.com/"), "unknown");
    }

    #[test]
    fn score_parses_with_thousands_separator() {
        assert_eq!(parse_score(r#"<div class="score unvoted">1,234</div>"#), 1234);
        assert_eq!(parse_score("<div>no score here</div>"), 0);
    }

    #[test]
    fn garbage_markup_is_a_parse_error_not_a_panic() {
        let err = extract_listing("<html><body>nothing useful</body></html>", "rust").unwrap_err();
        assert!(matches!(err, StrategyError::Parse(_)));
        let err = extract_thread("<html></html>", "https://old.reddit.com/r/x/comments/y")
            .unwrap_err();
        assert!(matches!(err, StrategyError::Parse(_)));
    }
}
