// src/retrieve/strategies/api.rs
//! Authenticated API strategy: OAuth2 client-credentials against the
//! platform's token endpoint, then the `oauth.reddit.com` listing endpoints.
//!
//! The credential check runs before any network I/O — a missing or malformed
//! triple is the cheapest possible failure, and the coordinator relies on it
//! being latency-free to skip this strategy.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{RedditCredentials, RetrieverSettings};
use crate::content::{ContentModel, RetrievalRequest};
use crate::error::StrategyError;
use crate::retrieve::strategies::build_client;
use crate::retrieve::types::{RetrievalStrategy, StrategyTag};
use crate::retrieve::wire;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_HOST: &str = "https://oauth.reddit.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

pub struct ApiStrategy {
    credentials: RedditCredentials,
    mode: Mode,
}

enum Mode {
    Http { client: reqwest::Client },
    /// Canned response body instead of the token + listing round trips.
    Fixture(String),
}

impl ApiStrategy {
    pub fn new(credentials: RedditCredentials, settings: &RetrieverSettings) -> Self {
        Self {
            credentials,
            mode: Mode::Http {
                client: build_client(settings),
            },
        }
    }

    pub fn from_fixture(credentials: RedditCredentials, body: &str) -> Self {
        Self {
            credentials,
            mode: Mode::Fixture(body.to_string()),
        }
    }

    async fn obtain_token(&self, client: &reqwest::Client) -> Result<String, StrategyError> {
        // is_complete() was checked by the caller; these cannot fail here.
        let id = self.credentials.client_id.as_deref().unwrap_or_default();
        let secret = self.credentials.client_secret.as_deref().unwrap_or_default();
        let agent = self.credentials.user_agent.as_deref().unwrap_or_default();

        let resp = client
            .post(TOKEN_URL)
            .basic_auth(id, Some(secret))
            .header(reqwest::header::USER_AGENT, agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StrategyError::from_status(status.as_u16(), "token endpoint"));
        }
        let token: TokenResponse = resp.json().await?;
        if token.access_token.trim().is_empty() {
            return Err(StrategyError::Auth("token endpoint returned no token".into()));
        }
        Ok(token.access_token)
    }

    async fn fetch_body(&self, request: &RetrievalRequest) -> Result<String, StrategyError> {
        match &self.mode {
            Mode::Fixture(body) => Ok(body.clone()),
            Mode::Http { client } => {
                let token = self.obtain_token(client).await?;
                let agent = self.credentials.user_agent.as_deref().unwrap_or_default();
                let url = match wire::request_paths(request) {
                    wire::RequestShape::Listing(path) => format!("{OAUTH_HOST}{path}"),
                    wire::RequestShape::Thread(url) => oauth_thread_url(url)?,
                };
                let resp = client
                    .get(&url)
                    .bearer_auth(&token)
                    .header(reqwest::header::USER_AGENT, agent)
                    .send()
                    .await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(StrategyError::from_status(status.as_u16(), "oauth listing"));
                }
                Ok(resp.text().await?)
            }
        }
    }
}

/// Rewrite a public post URL onto the OAuth host, `.json` suffix included.
fn oauth_thread_url(url: &str) -> Result<String, StrategyError> {
    let path_start = url
        .find("/r/")
        .ok_or_else(|| StrategyError::Parse(format!("no subreddit path in {url}")))?;
    Ok(wire::thread_json_url(&format!(
        "{OAUTH_HOST}{}",
        &url[path_start..]
    )))
}

#[async_trait]
impl RetrievalStrategy for ApiStrategy {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<Vec<ContentModel>, StrategyError> {
        if !self.credentials.is_complete() {
            // Short-circuit: no network call without the full triple.
            return Err(StrategyError::Auth(
                "client id/secret/user agent not configured".into(),
            ));
        }

        let body = self.fetch_body(request).await?;
        let models = match request {
            RetrievalRequest::Search { .. } => wire::parse_listing(&body, "api listing")?
                .into_iter()
                .map(|p| wire::into_model(p, Vec::new(), StrategyTag::Api))
                .filter(ContentModel::has_content)
                .collect(),
            RetrievalRequest::Url { .. } => {
                let (post, comments) = wire::parse_thread(&body, "api thread")?;
                vec![wire::into_model(post, comments, StrategyTag::Api)]
            }
        };
        Ok(models)
    }

    fn tag(&self) -> StrategyTag {
        StrategyTag::Api
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_thread_url_rewrites_the_host() {
        let url = "https://www.reddit.com/r/rust/comments/abc123/title/";
        assert_eq!(
            oauth_thread_url(url).unwrap(),
            "https://oauth.reddit.com/r/rust/comments/abc123/title.json"
        );
    }
}
