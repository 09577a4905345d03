// src/retrieve/strategies/public_json.rs
//! Public-JSON strategy: the platform's unauthenticated `.json` endpoints.
//! No credentials needed, but aggressively throttled (429/503) for
//! anonymous clients, which is exactly the class this maps to `RateLimit`.

use async_trait::async_trait;

use crate::config::RetrieverSettings;
use crate::content::{ContentModel, RetrievalRequest};
use crate::error::StrategyError;
use crate::retrieve::strategies::{build_client, get_checked};
use crate::retrieve::types::{RetrievalStrategy, StrategyTag};
use crate::retrieve::wire;

const PUBLIC_HOST: &str = "https://www.reddit.com";

pub struct PublicJsonStrategy {
    mode: Mode,
}

enum Mode {
    Http { client: reqwest::Client },
    Fixture(String),
}

impl PublicJsonStrategy {
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

    async fn fetch_body(&self, request: &RetrievalRequest) -> Result<String, StrategyError> {
        match &self.mode {
            Mode::Fixture(body) => Ok(body.clone()),
            Mode::Http { client } => {
                let url = match wire::request_paths(request) {
                    wire::RequestShape::Listing(path) => format!("{PUBLIC_HOST}{path}"),
                    wire::RequestShape::Thread(url) => wire::thread_json_url(url),
                };
                get_checked(client, &url, "public json").await
            }
        }
    }
}

#[async_trait]
impl RetrievalStrategy for PublicJsonStrategy {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<Vec<ContentModel>, StrategyError> {
        let body = self.fetch_body(request).await?;
        let models = match request {
            RetrievalRequest::Search { .. } => wire::parse_listing(&body, "public listing")?
                .into_iter()
                .map(|p| wire::into_model(p, Vec::new(), StrategyTag::PublicJson))
                .filter(ContentModel::has_content)
                .collect(),
            RetrievalRequest::Url { .. } => {
                let (post, comments) = wire::parse_thread(&body, "public thread")?;
                vec![wire::into_model(post, comments, StrategyTag::PublicJson)]
            }
        };
        Ok(models)
    }

    fn tag(&self) -> StrategyTag {
        StrategyTag::PublicJson
    }
}
