// src/retrieve/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::{ContentModel, RetrievalRequest};
use crate::error::StrategyError;

/// Identifies a retrieval strategy variant in preference orders, in
/// `ContentModel::retrieved_via`, and in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTag {
    /// OAuth client-credentials API. Most authoritative, needs credentials.
    Api,
    /// Unauthenticated `.json` endpoints.
    PublicJson,
    /// old-reddit markup extraction. Most fragile.
    HtmlScrape,
    /// Canned deterministic posts; never fails.
    Mock,
}

impl StrategyTag {
    /// Most-authoritative first, guaranteed-available last.
    pub const DEFAULT_ORDER: [StrategyTag; 4] = [
        StrategyTag::Api,
        StrategyTag::PublicJson,
        StrategyTag::HtmlScrape,
        StrategyTag::Mock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyTag::Api => "api",
            StrategyTag::PublicJson => "public_json",
            StrategyTag::HtmlScrape => "html_scrape",
            StrategyTag::Mock => "mock",
        }
    }

    pub fn parse(s: &str) -> Option<StrategyTag> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Some(StrategyTag::Api),
            "public_json" | "json" => Some(StrategyTag::PublicJson),
            "html_scrape" | "html" | "web" => Some(StrategyTag::HtmlScrape),
            "mock" | "demo" => Some(StrategyTag::Mock),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete way of turning a request into content.
#[async_trait::async_trait]
pub trait RetrievalStrategy: Send + Sync {
    async fn fetch(&self, request: &RetrievalRequest) -> Result<Vec<ContentModel>, StrategyError>;
    fn tag(&self) -> StrategyTag;
}
