//! Inference client tests against an in-process HTTP stand-in


use similar_asserts::assert_eq;

use daily_standup::summary::{GenerationError, OllamaClient, Summarizer};
use test_utils::{StubEndpoint, ollama_settings, sample_commit};

#[tokio::test]
async fn test_summary_from_endpoint() {
    let stub = StubEndpoint::serve(vec![(
        200,
        r#"{"model":"test-model","response":"Fixed a bug and added a feature.","done":true}"#
            .to_string(),
    )])
    .await;
    let client = OllamaClient::new(ollama_settings(&stub.url)).unwrap();

    let summary = client
        .summarize(&[
            sample_commit("aaaa1111", "fix bug"),
            sample_commit("bbbb2222", "add feature\nwith detail"),
        ])
        .await
        .expect("summary");

    assert_eq!(summary, "Fixed a bug and added a feature.");

    let bodies = stub.request_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "test-model");
    assert_eq!(bodies[0]["stream"], false);
    let prompt = bodies[0]["prompt"].as_str().expect("prompt");
    assert!(prompt.contains("fix bug"));
    assert!(prompt.contains("with detail"));
}

#[tokio::test]
async fn test_endpoint_error_message() {
    let stub = StubEndpoint::serve(vec![(
        404,
        r#"{"error":"model \"test-model\" not found, try pulling it first"}"#.to_string(),
    )])
    .await;
    let client = OllamaClient::new(ollama_settings(&stub.url)).unwrap();

    let result = client.summarize(&[sample_commit("aaaa1111", "fix bug")]).await;
    assert!(matches!(result, Err(GenerationError::Endpoint(m)) if m.contains("not found")));
}

#[tokio::test]
async fn test_empty_endpoint_response() {
    let stub = StubEndpoint::serve(vec![(200, r#"{"response":""}"#.to_string())]).await;
    let client = OllamaClient::new(ollama_settings(&stub.url)).unwrap();

    let result = client.summarize(&[sample_commit("aaaa1111", "fix bug")]).await;
    assert!(matches!(result, Err(GenerationError::EmptyResponse)));
}

#[tokio::test]
async fn test_stalled_endpoint_times_out() {
    let stub = StubEndpoint::stall().await;
    let client = OllamaClient::new(ollama_settings(&stub.url)).unwrap();

    let result = client.summarize(&[sample_commit("aaaa1111", "fix bug")]).await;
    assert!(matches!(result, Err(GenerationError::Timeout(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = OllamaClient::new(ollama_settings(&format!("http://127.0.0.1:{port}"))).unwrap();

    let result = client.summarize(&[sample_commit("aaaa1111", "fix bug")]).await;
    assert!(matches!(result, Err(GenerationError::Request(_))));
}

#[tokio::test]
async fn test_retry_after_failed_attempt() {
    let stub = StubEndpoint::serve(vec![
        (500, "internal error".to_string()),
        (200, r#"{"response":"Recovered."}"#.to_string()),
    ])
    .await;
    let mut settings = ollama_settings(&stub.url);
    settings.attempts = 2;
    let client = OllamaClient::new(settings).unwrap();

    let summary = client
        .summarize(&[sample_commit("aaaa1111", "fix bug")])
        .await
        .expect("second attempt succeeds");

    assert_eq!(summary, "Recovered.");
    assert_eq!(stub.request_bodies().len(), 2);
}

#[tokio::test]
async fn test_single_attempt_does_not_retry() {
    let stub = StubEndpoint::serve(vec![
        (500, "internal error".to_string()),
        (200, r#"{"response":"Too late."}"#.to_string()),
    ])
    .await;
    let client = OllamaClient::new(ollama_settings(&stub.url)).unwrap();

    let result = client.summarize(&[sample_commit("aaaa1111", "fix bug")]).await;
    assert!(matches!(
        result,
        Err(GenerationError::Status { status: 500, .. })
    ));
    assert_eq!(stub.request_bodies().len(), 1);
}
