// src/lib.rs
// Public library surface: the chat host wires ChatSession up and renders
// whatever ChatReply it gets back.

pub mod cancel;
pub mod config;
pub mod content;
pub mod error;
pub mod retrieve;
pub mod session;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::cancel::CancelToken;
pub use crate::config::{RedditCredentials, RetrieverSettings};
pub use crate::content::{Comment, ContentModel, RetrievalRequest};
pub use crate::error::{CoreError, StrategyAttempt, StrategyError, StrategyErrorKind};
pub use crate::retrieve::types::{RetrievalStrategy, StrategyTag};
pub use crate::retrieve::{FetchOutcome, RetrievalCoordinator};
pub use crate::session::{ChatReply, ChatSession, PostRef, SessionConfig};
pub use crate::summarize::{SummaryConstraint, SummaryEngine, SummaryResult};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - a debug build
///   - SUMMARIZER_DEV_LOG=1
pub fn enable_dev_tracing() {
    let dev_flag = std::env::var("SUMMARIZER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    if !(dev_flag && cfg!(debug_assertions)) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reddit_summarizer=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Convenience wiring for the common case: credentials from `.env`, default
/// transport settings, all four strategies registered.
pub fn default_session() -> ChatSession {
    let credentials = RedditCredentials::from_dotenv();
    let settings = RetrieverSettings::default();
    let coordinator = RetrievalCoordinator::with_defaults(credentials, &settings);
    ChatSession::new(coordinator, SummaryEngine::new())
}
