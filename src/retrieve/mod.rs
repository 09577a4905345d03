// src/retrieve/mod.rs
pub mod strategies;
pub mod types;
pub mod wire;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::cancel::CancelToken;
use crate::config::{RedditCredentials, RetrieverSettings};
use crate::content::{ContentModel, RetrievalRequest};
use crate::error::{CoreError, StrategyAttempt, StrategyErrorKind};
use crate::retrieve::strategies::{
    api::ApiStrategy, html::HtmlScrapeStrategy, mock::MockStrategy,
    public_json::PublicJsonStrategy,
};
use crate::retrieve::types::{RetrievalStrategy, StrategyTag};

/// One-time metrics registration (so series carry descriptions wherever the
/// host installs a recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "retrieval_attempts_total",
            "Strategy fetch attempts, successful or not."
        );
        describe_counter!(
            "retrieval_errors_total",
            "Strategy fetch/parse errors swallowed by the fallback loop."
        );
        describe_counter!(
            "retrieval_success_total",
            "Requests satisfied by some strategy."
        );
        describe_counter!(
            "retrieval_exhausted_total",
            "Requests where every strategy in the order failed."
        );
        describe_histogram!("retrieval_fetch_ms", "Per-strategy fetch time in milliseconds.");
    });
}

/// Normalize a single-line field: decode entities, strip tags, collapse
/// whitespace, trim.
pub fn normalize_inline(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Normalize a block of text while preserving paragraph boundaries, which
/// the summarizer ranks and truncates on. Whitespace inside a paragraph is
/// collapsed; blank lines become exactly one paragraph break.
pub fn normalize_block(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).replace("\r\n", "\n");

    static RE_PARA: OnceCell<regex::Regex> = OnceCell::new();
    let re_para = RE_PARA.get_or_init(|| regex::Regex::new(r"\n\s*\n").unwrap());

    re_para
        .split(&decoded)
        .map(normalize_inline)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A satisfied fetch plus the diagnostic trail of everything tried before.
#[derive(Debug)]
pub struct FetchOutcome {
    pub models: Vec<ContentModel>,
    pub via: StrategyTag,
    pub attempts: Vec<StrategyAttempt>,
}

/// Orders strategies by caller preference and falls back on failure.
/// Performs no I/O itself; every network call is the strategy's.
pub struct RetrievalCoordinator {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
}

impl RetrievalCoordinator {
    pub fn new(strategies: Vec<Box<dyn RetrievalStrategy>>) -> Self {
        Self { strategies }
    }

    /// All four variants wired to real transports; the usual entry point.
    pub fn with_defaults(credentials: RedditCredentials, settings: &RetrieverSettings) -> Self {
        Self::new(vec![
            Box::new(ApiStrategy::new(credentials, settings)),
            Box::new(PublicJsonStrategy::new(settings)),
            Box::new(HtmlScrapeStrategy::new(settings)),
            Box::new(MockStrategy::new()),
        ])
    }

    fn strategy(&self, tag: StrategyTag) -> Option<&dyn RetrievalStrategy> {
        self.strategies
            .iter()
            .find(|s| s.tag() == tag)
            .map(|s| s.as_ref())
    }

    /// Try strategies in `order` until one returns a non-empty, invariant-
    /// honoring result. Per-strategy errors are recorded and swallowed; only
    /// exhaustion (or caller misuse / cancellation) crosses this boundary.
    pub async fn fetch(
        &self,
        request: &RetrievalRequest,
        order: &[StrategyTag],
        cancel: &CancelToken,
    ) -> Result<FetchOutcome, CoreError> {
        ensure_metrics_described();
        request.validate()?;
        if order.is_empty() {
            return Err(CoreError::Config("strategy order must not be empty".into()));
        }

        let mut attempts: Vec<StrategyAttempt> = Vec::new();

        for &tag in order {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            let Some(strategy) = self.strategy(tag) else {
                return Err(CoreError::Config(format!(
                    "strategy '{tag}' is not registered"
                )));
            };

            counter!("retrieval_attempts_total").increment(1);
            let t0 = std::time::Instant::now();
            let result = strategy.fetch(request).await;
            histogram!("retrieval_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

            match result {
                Ok(models) => {
                    // Empty results and invariant violations are failures of
                    // this strategy, not degenerate successes.
                    if models.is_empty() {
                        tracing::warn!(strategy = %tag, "strategy returned no posts");
                        attempts.push(StrategyAttempt {
                            tag,
                            kind: StrategyErrorKind::NotFound,
                            detail: "empty result".into(),
                        });
                        counter!("retrieval_errors_total").increment(1);
                        continue;
                    }
                    if let Some(bad) = models.iter().find(|m| !m.has_content()) {
                        tracing::warn!(strategy = %tag, post = %bad.source_id, "empty post body and comments");
                        attempts.push(StrategyAttempt {
                            tag,
                            kind: StrategyErrorKind::Parse,
                            detail: format!("post {} had no body and no comments", bad.source_id),
                        });
                        counter!("retrieval_errors_total").increment(1);
                        continue;
                    }

                    let models = models
                        .into_iter()
                        .map(|mut m| {
                            m.retrieved_via = tag;
                            m
                        })
                        .collect();
                    counter!("retrieval_success_total").increment(1);
                    tracing::debug!(strategy = %tag, fallbacks = attempts.len(), "fetch satisfied");
                    return Ok(FetchOutcome {
                        models,
                        via: tag,
                        attempts,
                    });
                }
                Err(e) => {
                    tracing::warn!(strategy = %tag, error = %e, "strategy failed, falling back");
                    counter!("retrieval_errors_total").increment(1);
                    attempts.push(StrategyAttempt {
                        tag,
                        kind: e.kind(),
                        detail: e.to_string(),
                    });
                }
            }
        }

        counter!("retrieval_exhausted_total").increment(1);
        Err(CoreError::AllStrategiesExhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_inline_collapses_and_decodes() {
        assert_eq!(
            normalize_inline("  Hello,&nbsp;&nbsp; <b>world</b>  "),
            "Hello, world"
        );
        assert_eq!(normalize_inline("\u{201C}ok\u{201D}"), "\"ok\"");
    }

    #[test]
    fn normalize_block_preserves_paragraph_breaks() {
        let s = "first  paragraph\nstill first\n\n  \nsecond &amp; last";
        assert_eq!(
            normalize_block(s),
            "first paragraph still first\n\nsecond & last"
        );
    }
}
