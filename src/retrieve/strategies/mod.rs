// src/retrieve/strategies/mod.rs
pub mod api;
pub mod html;
pub mod mock;
pub mod public_json;

use std::time::Duration;

use crate::config::RetrieverSettings;
use crate::error::StrategyError;

/// Build the per-strategy HTTP client with the configured timeout and agent.
pub(crate) fn build_client(settings: &RetrieverSettings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(settings.user_agent.clone())
        .build()
        .expect("http client construction")
}

/// GET a URL, map non-2xx statuses into the strategy taxonomy, return the body.
pub(crate) async fn get_checked(
    client: &reqwest::Client,
    url: &str,
    context: &str,
) -> Result<String, StrategyError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(StrategyError::from_status(status.as_u16(), context));
    }
    Ok(resp.text().await?)
}
