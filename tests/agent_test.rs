//! # Agent Tests
//!
//! Drives the page agent the way the popup does: a `scrape` request in, an
//! immediate relay of the scraped article, then the backend's answer.

use serde_json::json;
use std::sync::Once;
use std::time::Duration;
use sumlink::{
    DeliveryClient, DeliveryOptions, Envelope, Page, PageAgent, Request, Response,
    ScrapeOptions, Scraper,
};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt().with_test_writer().init();
    });
}

const ARTICLE: &str = r#"
<html>
<head><title>Storm Clears</title></head>
<body>
    <article>
        <div class="author">Sam Reed</div>
        <p>Residents of the valley woke to clear skies on Sunday after a week of storms
           that flooded roads and closed schools across the region.</p>
    </article>
</body>
</html>
"#;

fn agent(server: &MockServer, attempts: u32) -> PageAgent {
    let scraper = Scraper::new(ScrapeOptions::default()).unwrap();
    let delivery = DeliveryClient::http(
        DeliveryOptions::builder()
            .endpoint(format!("{}/analyze", server.uri()))
            .max_attempts(attempts)
            .base_delay(Duration::from_millis(5))
            .max_delay(Duration::from_millis(10))
            .build(),
    )
    .unwrap();
    PageAgent::new(scraper, delivery)
}

#[tokio::test]
async fn scrape_request_relays_then_replies_with_backend_body() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Storms end in the valley.",
            "alternative_sources": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agent = agent(&server, 3);
    let mut page = Page::parse(ARTICLE, Some("https://valley.example/storm")).unwrap();
    let (relay, mut relayed) = mpsc::unbounded_channel();

    let reply = agent
        .handle(Request::Scrape, &mut page, &relay)
        .await
        .expect("scrape requests are answered");

    let first = relayed.try_recv().expect("scrape result relayed");
    assert!(first.success);
    let data = first.data.unwrap();
    assert_eq!(data["metadata"]["author"], "Sam Reed");
    assert_eq!(data["metadata"]["title"], "Storm Clears");
    assert_eq!(data["metadata"]["source"], "valley.example");

    assert_eq!(
        reply,
        Response::success(json!({
            "summary": "Storms end in the valley.",
            "alternative_sources": []
        }))
    );
}

#[tokio::test]
async fn short_page_fails_without_contacting_backend() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let agent = agent(&server, 3);
    let mut page = Page::parse("<body><div>Short content</div></body>", None).unwrap();
    let (relay, mut relayed) = mpsc::unbounded_channel();

    let reply = agent.handle(Request::Scrape, &mut page, &relay).await.unwrap();

    assert_eq!(
        reply,
        Response::failure("Insufficient content found to summarize.")
    );
    assert!(relayed.try_recv().is_err());
}

#[tokio::test]
async fn delivery_failure_is_reported_after_relay() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let agent = agent(&server, 2);
    let mut page = Page::parse(ARTICLE, None).unwrap();
    let (relay, mut relayed) = mpsc::unbounded_channel();

    let reply = agent.handle(Request::Scrape, &mut page, &relay).await.unwrap();

    assert!(relayed.try_recv().unwrap().success);
    assert!(!reply.success);
    let error = reply.error.unwrap();
    assert!(error.starts_with("Backend unreachable after 2 attempts"), "{error}");
}

#[tokio::test]
async fn dropped_relay_and_unknown_actions_are_tolerated() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "ok"})))
        .mount(&server)
        .await;

    let agent = agent(&server, 1);
    let mut page = Page::parse(ARTICLE, None).unwrap();
    let (relay, relayed) = mpsc::unbounded_channel();
    drop(relayed);

    assert!(agent.handle(Request::Unknown, &mut page, &relay).await.is_none());
    let reply = agent.handle(Request::Scrape, &mut page, &relay).await.unwrap();
    assert!(reply.success);
}

#[tokio::test]
async fn serve_answers_each_envelope_once() {
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "served"})))
        .expect(2)
        .mount(&server)
        .await;

    let agent = agent(&server, 1);
    let mut page = Page::parse(ARTICLE, None).unwrap();
    let (inbox_tx, inbox_rx) = mpsc::channel(4);
    let (relay, _relayed) = mpsc::unbounded_channel();

    let request: Request = serde_json::from_str(r#"{"action":"scrape"}"#).unwrap();
    let (envelope, reply) = Envelope::new(request);
    inbox_tx.send(envelope).await.unwrap();

    // nobody waits on this reply
    let (abandoned, abandoned_reply) = Envelope::new(Request::Scrape);
    drop(abandoned_reply);
    inbox_tx.send(abandoned).await.unwrap();

    let (unknown, unknown_reply) = Envelope::new(Request::Unknown);
    inbox_tx.send(unknown).await.unwrap();
    drop(inbox_tx);

    agent.serve(&mut page, inbox_rx, relay).await;

    let response = reply.await.unwrap();
    assert_eq!(response.data, Some(json!({"summary": "served"})));
    assert!(unknown_reply.await.is_err());
}
