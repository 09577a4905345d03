// src/config.rs
//! Credential and preference loading.
//!
//! Credentials are three optional strings handed in by the host's
//! configuration layer; absence is not an error here — it is the signal the
//! authenticated strategy uses for its fast auth failure. The strategy-order
//! file follows the env-var + `config/` fallback chain, TOML or JSON.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::retrieve::types::StrategyTag;

const ENV_ORDER_PATH: &str = "SUMMARIZER_ORDER_PATH";

pub const ENV_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const ENV_USER_AGENT: &str = "REDDIT_USER_AGENT";

/// The credential triple for the authenticated API strategy.
#[derive(Debug, Clone, Default)]
pub struct RedditCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: Option<String>,
}

impl RedditCredentials {
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            client_id: none_if_blank(client_id),
            client_secret: none_if_blank(client_secret),
            user_agent: none_if_blank(user_agent),
        }
    }

    /// Read the triple from the environment. Missing variables stay `None`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(ENV_CLIENT_ID).ok(),
            std::env::var(ENV_CLIENT_SECRET).ok(),
            std::env::var(ENV_USER_AGENT).ok(),
        )
    }

    /// Load `.env` first (no-op when absent), then read the environment.
    pub fn from_dotenv() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// All three values present and non-blank.
    pub fn is_complete(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.user_agent.is_some()
    }
}

fn none_if_blank(v: Option<String>) -> Option<String> {
    v.and_then(|s| {
        let t = s.trim().to_string();
        if t.is_empty() {
            None
        } else {
            Some(t)
        }
    })
}

/// Knobs shared by every network strategy.
#[derive(Debug, Clone)]
pub struct RetrieverSettings {
    /// Sent on unauthenticated requests; the platform rejects blank agents.
    pub user_agent: String,
    /// Per-call timeout. A timeout maps to a network error so the
    /// coordinator falls back instead of hanging the request.
    pub timeout_secs: u64,
}

impl Default for RetrieverSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            timeout_secs: 10,
        }
    }
}

/// Parse a comma-separated order string, e.g. `"api, json, mock"`.
pub fn parse_order(s: &str) -> Result<Vec<StrategyTag>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let tag =
            StrategyTag::parse(part).ok_or_else(|| anyhow!("unknown strategy tag '{part}'"))?;
        out.push(tag);
    }
    if out.is_empty() {
        return Err(anyhow!("strategy order is empty"));
    }
    Ok(out)
}

/// Load a strategy order from an explicit path. Supports TOML or JSON.
pub fn load_order_from(path: &Path) -> Result<Vec<StrategyTag>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading strategy order from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_order_file(&content, ext.as_str())
}

/// Load the strategy order using env var + fallbacks:
/// 1) $SUMMARIZER_ORDER_PATH
/// 2) config/strategy_order.toml
/// 3) config/strategy_order.json
/// 4) built-in default order
pub fn load_order_default() -> Result<Vec<StrategyTag>> {
    if let Ok(p) = std::env::var(ENV_ORDER_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_order_from(&pb);
        } else {
            return Err(anyhow!("SUMMARIZER_ORDER_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/strategy_order.toml");
    if toml_p.exists() {
        return load_order_from(&toml_p);
    }
    let json_p = PathBuf::from("config/strategy_order.json");
    if json_p.exists() {
        return load_order_from(&json_p);
    }
    Ok(StrategyTag::DEFAULT_ORDER.to_vec())
}

fn parse_order_file(s: &str, hint_ext: &str) -> Result<Vec<StrategyTag>> {
    let try_toml = hint_ext == "toml" || s.contains("order");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported strategy order format"))
}

fn parse_toml(s: &str) -> Result<Vec<StrategyTag>> {
    #[derive(serde::Deserialize)]
    struct OrderFile {
        order: Vec<String>,
    }
    let v: OrderFile = toml::from_str(s)?;
    tags_from(v.order)
}

fn parse_json(s: &str) -> Result<Vec<StrategyTag>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    tags_from(v)
}

fn tags_from(items: Vec<String>) -> Result<Vec<StrategyTag>> {
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let tag = StrategyTag::parse(&it).ok_or_else(|| anyhow!("unknown strategy tag '{it}'"))?;
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    if out.is_empty() {
        return Err(anyhow!("strategy order is empty"));
    }
    Ok(out)
}
