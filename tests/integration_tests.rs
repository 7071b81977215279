//! Integration tests for the guarded answer client.
//!
//! These drive `AskQuestionUseCase` against a real `GeminiClient` talking to a
//! local mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};

use guarded_answer::{
    is_refusal, AskQuestionUseCase, FailureKind, GeminiClient, GeminiConfig, RetryPolicy,
    REFUSAL_MESSAGE, SYSTEM_INSTRUCTION,
};

const PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn use_case(server: &ServerGuard) -> AskQuestionUseCase {
    let config = GeminiConfig::new("integration-key")
        .with_base_url(server.url())
        .with_model("gemini-test");
    AskQuestionUseCase::new(Arc::new(GeminiClient::new(config)))
        .with_retry_policy(RetryPolicy::default().with_initial_delay(Duration::from_millis(5)))
}

#[tokio::test]
async fn test_answers_question_end_to_end() {
    let mut server = Server::new_async().await;
    let question = "When was JPMorgan Chase founded?";
    let expected_prompt = format!("{SYSTEM_INSTRUCTION}\n\nUser's question: \"{question}\"");

    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "integration-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [{ "parts": [{ "text": expected_prompt }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Founded in 1799"}]}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let answer = use_case(&server).ask(question).await.expect("should answer");

    assert_eq!(answer.text(), "Founded in 1799");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blank_question_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", PATH).expect(0).create_async().await;

    let err = use_case(&server).ask(" \t ").await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::InvalidInput);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_persistent_server_errors_exhaust_four_attempts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("unavailable")
        .expect(4)
        .create_async()
        .await;

    let err = use_case(&server)
        .ask("What is JPMC's market cap?")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Unavailable);
    assert!(err.to_string().contains("HTTP error! status: 503"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let err = use_case(&server).ask("Who runs JPMC?").await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::MalformedResponse);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_refusal_is_passed_through_verbatim() {
    let mut server = Server::new_async().await;
    let body = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": REFUSAL_MESSAGE }] } }]
    })
    .to_string();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let answer = use_case(&server)
        .ask("What is the capital of France?")
        .await
        .unwrap();

    assert!(answer.is_refusal());
    assert!(is_refusal(answer.text()));
}
