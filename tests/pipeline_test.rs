use autoblog::aggregator::Aggregator;
use autoblog::fetcher::FetchConfig;
use autoblog::pipeline::{run_pipeline, RunOutcome};
use autoblog::publisher::{PostGateway, Publisher};
use autoblog::summarizer::Summarizer;
use autoblog::types::{PipelineError, Result, Source};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingGateway {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    fail_with: Option<String>,
}

impl PostGateway for RecordingGateway {
    fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        match &self.fail_with {
            Some(reason) => Err(PipelineError::General(reason.clone())),
            None => Ok(()),
        }
    }
}

const FEED_XML: &str = "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
    <title>Feed</title><link>https://example.com/</link><description>d</description>\
    <item><title>A</title><description>x</description><link>https://example.com/1</link></item>\
    <item><title>B</title><description>y</description><link>https://example.com/2</link></item>\
    </channel></rss>";

const EMPTY_FEED_XML: &str = "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
    <title>Feed</title><link>https://example.com/</link><description>d</description>\
    </channel></rss>";

fn components(server: &MockServer, models: &[&str]) -> (Aggregator, Summarizer) {
    let aggregator = Aggregator::new(&FetchConfig::default()).expect("aggregator");
    let summarizer = Summarizer::new(
        server.uri(),
        "test-token".to_string(),
        models.iter().map(|m| m.to_string()).collect(),
    )
    .expect("summarizer");
    (aggregator, summarizer)
}

#[tokio::test]
async fn full_pass_publishes_via_fallback_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED_XML, "application/rss+xml"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/model-a"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/model-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "generated_text": "# My Title\nSome body text." }
        ])))
        .mount(&server)
        .await;

    let (aggregator, summarizer) = components(&server, &["model-a", "model-b"]);
    let gateway = RecordingGateway::default();
    let publisher = Publisher::new(Box::new(gateway.clone()));
    let sources = vec![Source::new(format!("{}/feed.xml", server.uri()), 2)];

    let outcome = run_pipeline(&aggregator, &summarizer, &publisher, &sources).await;

    assert!(outcome.is_published());
    let calls = gateway.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![("My Title".to_string(), "Some body text.".to_string())]
    );
}

#[tokio::test]
async fn empty_sources_short_circuit_before_generation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(EMPTY_FEED_XML, "application/rss+xml"))
        .mount(&server)
        .await;

    // The generation backend must never be contacted.
    Mock::given(method("POST"))
        .and(path("/model-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (aggregator, summarizer) = components(&server, &["model-a"]);
    let gateway = RecordingGateway::default();
    let publisher = Publisher::new(Box::new(gateway.clone()));
    let sources = vec![Source::new(format!("{}/feed.xml", server.uri()), 2)];

    let outcome = run_pipeline(&aggregator, &summarizer, &publisher, &sources).await;

    assert!(matches!(outcome, RunOutcome::NothingToPublish));
    assert!(gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn exhausted_backends_fail_generation_without_delivery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED_XML, "application/rss+xml"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (aggregator, summarizer) = components(&server, &["model-a", "model-b"]);
    let gateway = RecordingGateway::default();
    let publisher = Publisher::new(Box::new(gateway.clone()));
    let sources = vec![Source::new(format!("{}/feed.xml", server.uri()), 2)];

    let outcome = run_pipeline(&aggregator, &summarizer, &publisher, &sources).await;

    match outcome {
        RunOutcome::GenerationFailed { reason } => {
            assert!(reason.contains("503"), "got: {}", reason);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delivery_failure_is_attributed_to_delivery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED_XML, "application/rss+xml"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/model-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
            { "generated_text": "Title\nBody" }
        )))
        .mount(&server)
        .await;

    let (aggregator, summarizer) = components(&server, &["model-a"]);
    let gateway = RecordingGateway {
        calls: Arc::new(Mutex::new(Vec::new())),
        fail_with: Some("authentication failed".to_string()),
    };
    let publisher = Publisher::new(Box::new(gateway.clone()));
    let sources = vec![Source::new(format!("{}/feed.xml", server.uri()), 2)];

    let outcome = run_pipeline(&aggregator, &summarizer, &publisher, &sources).await;

    match outcome {
        RunOutcome::DeliveryFailed { reason } => {
            assert!(reason.contains("delivery failed"));
            assert!(reason.contains("authentication failed"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    // Generation succeeded; exactly one delivery was attempted.
    assert_eq!(gateway.calls.lock().unwrap().len(), 1);
}
