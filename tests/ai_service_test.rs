mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use study_mentor_backend::{
    dto::generation_dto::SummaryRequest,
    error::Error,
    models::quiz::{Difficulty, Language},
    services::ai_service::{AIService, OpenAiGateway},
};
use tokio::sync::Mutex;

fn gateway(base_url: &str) -> AIService {
    let gateway = OpenAiGateway::new(
        Client::new(),
        "sk-test".into(),
        base_url.into(),
        "gpt-4o-mini".into(),
        Duration::from_secs(5),
    );
    AIService::new(Arc::new(gateway))
}

fn completion(content: &str) -> JsonValue {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

fn quiz_body(count: usize) -> String {
    let questions: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "question": format!("What is fact {}?", i),
                "options": ["A", "B", "C", "D"],
                "correct": i % 4,
                "explanation": "It follows from the summary."
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

async fn fixed_llm(status: StatusCode, body: JsonValue) -> String {
    let router = Router::new().route(
        "/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    common::spawn(router).await
}

#[tokio::test]
async fn fenced_quiz_is_accepted() {
    let fenced = format!("```json\n{}\n```", quiz_body(5));
    let llm = fixed_llm(StatusCode::OK, completion(&fenced)).await;

    let quiz = gateway(&llm)
        .generate_quiz("Photosynthesis", Language::En)
        .await
        .unwrap();
    assert_eq!(quiz.questions().len(), 5);
    assert!(quiz.questions().iter().all(|q| q.options.len() == 4));
}

#[tokio::test]
async fn malformed_quiz_is_rejected() {
    for content in [
        "Sure! Here is your quiz.".to_string(),
        quiz_body(3),
        r#"{"questions":[{"question":"Q","options":["a","b"],"correct":0,"explanation":"e"}]}"#
            .to_string(),
    ] {
        let llm = fixed_llm(StatusCode::OK, completion(&content)).await;
        let err = gateway(&llm)
            .generate_quiz("Photosynthesis", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGeneration(_)), "{:?}", err);
    }
}

#[tokio::test]
async fn provider_rejecting_key_maps_to_auth_error() {
    let llm = fixed_llm(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "Incorrect API key provided" } }),
    )
    .await;
    let request = SummaryRequest {
        subject: "Photosynthesis".into(),
        difficulty: Difficulty::Simple,
        language: Language::En,
    };
    let err = gateway(&llm).generate_summary(&request).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamAuth(_)), "{:?}", err);
}

#[tokio::test]
async fn provider_failure_maps_to_generic_upstream_error() {
    let llm = fixed_llm(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;
    let err = gateway(&llm)
        .generate_quiz("Photosynthesis", Language::En)
        .await
        .unwrap_err();
    match err {
        Error::Upstream(msg) => assert_eq!(msg, "Failed to generate quiz"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    let llm = common::closed_port_url().await;
    let request = SummaryRequest {
        subject: "Photosynthesis".into(),
        difficulty: Difficulty::Normal,
        language: Language::En,
    };
    let err = gateway(&llm).generate_summary(&request).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn request_carries_model_key_and_two_messages() {
    let seen: Arc<Mutex<Option<(HeaderMap, JsonValue)>>> = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let router = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<JsonValue>| {
            let captured = captured.clone();
            async move {
                *captured.lock().await = Some((headers, body));
                Json(completion("## Photosynthesis\n\n- Light"))
            }
        }),
    );
    let llm = common::spawn(router).await;

    let request = SummaryRequest {
        subject: "Photosynthesis".into(),
        difficulty: Difficulty::Advanced,
        language: Language::Bg,
    };
    let summary = gateway(&llm).generate_summary(&request).await.unwrap();
    assert_eq!(summary, "## Photosynthesis\n\n- Light");

    let (headers, body) = seen.lock().await.take().expect("request captured");
    assert_eq!(
        headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer sk-test")
    );
    assert_eq!(body["model"], "gpt-4o-mini");
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert!(messages[1]["content"]
        .as_str()
        .unwrap()
        .contains("Photosynthesis"));
}

#[tokio::test]
async fn undecodable_success_body_is_an_upstream_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::OK, "<html>gateway page</html>") }),
    );
    let llm = common::spawn(router).await;

    let err = gateway(&llm)
        .generate_quiz("Photosynthesis", Language::En)
        .await
        .unwrap_err();
    match err {
        Error::Upstream(msg) => assert_eq!(msg, "Failed to generate quiz"),
        other => panic!("unexpected error: {:?}", other),
    }
}
