// tests/strategy_html.rs
use reddit_summarizer::retrieve::strategies::html::HtmlScrapeStrategy;
use reddit_summarizer::{RetrievalRequest, RetrievalStrategy, StrategyError, StrategyTag};

const LISTING_HTML: &str = include_str!("fixtures/old_reddit_listing.html");
const THREAD_HTML: &str = include_str!("fixtures/old_reddit_thread.html");

#[tokio::test]
async fn listing_markup_yields_self_posts_only() {
    let strategy = HtmlScrapeStrategy::from_fixture(LISTING_HTML);
    let models = strategy
        .fetch(&RetrievalRequest::search("rust", Some("async".into()), 10))
        .await
        .expect("listing extraction ok");

    // Three `thing` containers; the link post without expando text is dropped.
    assert_eq!(models.len(), 2);
    assert!(models.iter().all(|m| m.has_content()));
    assert!(models.iter().all(|m| m.retrieved_via == StrategyTag::HtmlScrape));

    let first = &models[0];
    assert_eq!(first.source_id, "1f00foo");
    assert_eq!(first.author, "crab_enthusiast");
    assert_eq!(first.score, 412);
    assert_eq!(first.subreddit, "rust");
    // The &mdash; entity is decoded, tags stripped.
    assert!(first.title.starts_with("Async traits finally stabilized"));
    assert!(!first.title.contains('<'));
    // <p> boundaries in the expando become paragraph breaks.
    assert!(first.body.contains("\n\n"));
}

#[tokio::test]
async fn listing_honors_the_requested_limit() {
    let strategy = HtmlScrapeStrategy::from_fixture(LISTING_HTML);
    let models = strategy
        .fetch(&RetrievalRequest::search("rust", None, 1))
        .await
        .unwrap();
    assert_eq!(models.len(), 1);
}

#[tokio::test]
async fn thread_markup_splits_body_from_comments() {
    let strategy = HtmlScrapeStrategy::from_fixture(THREAD_HTML);
    let models = strategy
        .fetch(&RetrievalRequest::url(
            "https://old.reddit.com/r/rust/comments/1f00foo/async_traits/",
        ))
        .await
        .expect("thread extraction ok");

    assert_eq!(models.len(), 1);
    let m = &models[0];
    assert!(m.body.starts_with("With async fn in traits"));
    assert_eq!(m.comments.len(), 2);
    assert!(m.comments[0].text.contains("object safety"));
    assert!(m.comments[1].text.contains("Measure before you migrate"));
    assert_eq!(m.subreddit, "rust");
}

#[tokio::test]
async fn partial_extraction_is_not_an_error() {
    // A thread page with a title and body but no comment area at all.
    let bare = r#"
      <div class="thing" data-fullname="t3_zz1" data-author="solo">
        <p class="title"><a class="title" href="/r/rust/comments/zz1/x/">Body only post</a></p>
        <div class="md"><p>Just the selftext, comments disabled.</p></div>
      </div>"#;
    let strategy = HtmlScrapeStrategy::from_fixture(bare);
    let models = strategy
        .fetch(&RetrievalRequest::url(
            "https://old.reddit.com/r/rust/comments/zz1/x/",
        ))
        .await
        .unwrap();
    assert_eq!(models.len(), 1);
    assert!(models[0].comments.is_empty());
    assert!(models[0].has_content());
}

#[tokio::test]
async fn missing_anchors_are_a_parse_error() {
    let strategy = HtmlScrapeStrategy::from_fixture("<html><body>maintenance page</body></html>");
    let err = strategy
        .fetch(&RetrievalRequest::search("rust", None, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, StrategyError::Parse(_)));

    let strategy = HtmlScrapeStrategy::from_fixture("<html><body>maintenance page</body></html>");
    let err = strategy
        .fetch(&RetrievalRequest::url(
            "https://old.reddit.com/r/rust/comments/zz1/x/",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, StrategyError::Parse(_)));
}
