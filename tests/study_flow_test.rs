mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use study_mentor_backend::{database::pool, routes, AppState};
use tower::ServiceExt;
use uuid::Uuid;

/// Answers summary prompts with markdown and quiz prompts with a valid set.
async fn scripted_llm() -> String {
    let router = Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<JsonValue>| async move {
            let user = body["messages"][1]["content"].as_str().unwrap_or_default();
            let content = if user.starts_with("Generate 5 quiz questions") {
                let questions: Vec<_> = (0..5)
                    .map(|i| {
                        json!({
                            "question": format!("Question {}", i),
                            "options": ["A", "B", "C", "D"],
                            "correct": 2,
                            "explanation": "From the summary."
                        })
                    })
                    .collect();
                format!("```json\n{}\n```", json!({ "questions": questions }))
            } else {
                "## Cell Biology\n\n- **Mitochondria** produce ATP".to_string()
            };
            Json(json!({ "choices": [{ "message": { "content": content } }] }))
        }),
    );
    common::spawn(router).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null))
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn study_flow_end_to_end() {
    dotenvy::dotenv().ok();
    let llm = scripted_llm().await;
    let config = common::test_config(&llm, "http://127.0.0.1:9");
    let db = pool::create_pool(&config).await.expect("pool");
    pool::run_migrations(&db).await.expect("migrations");
    let app = routes::app(AppState::new(db, config).expect("state"));

    let email = format!("it_{}@example.com", Uuid::new_v4());
    let (status, auth) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({ "email": email, "password": "secret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", auth);
    let bearer = format!("Bearer {}", auth["access_token"].as_str().unwrap());

    let (status, _) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({ "email": email, "password": "secret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, login) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", login);

    let (status, summary) = send(
        &app,
        "POST",
        "/generate-summary",
        Some(&bearer),
        Some(json!({ "subject": "  Cell Biology  ", "difficulty": "simple" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", summary);
    assert!(summary["summary"].as_str().unwrap().contains("Mitochondria"));
    let session_id = summary["sessionId"].as_str().unwrap().to_string();

    let (status, quiz) = send(
        &app,
        "POST",
        "/generate-quiz",
        Some(&bearer),
        Some(json!({ "subject": "Cell Biology", "sessionId": session_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", quiz);
    assert_eq!(quiz["questions"].as_array().unwrap().len(), 5);

    let (status, _) = send(
        &app,
        "POST",
        "/generate-quiz",
        Some(&bearer),
        Some(json!({ "subject": "Cell Biology", "sessionId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, result) = send(
        &app,
        "POST",
        "/quiz-results",
        Some(&bearer),
        Some(json!({
            "session_id": session_id,
            "total_questions": 5,
            "correct_answers": 3,
            "score_percentage": 60.0,
            "time_taken_seconds": 95
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", result);
    assert_eq!(result["score_percentage"], 60.0);

    let (status, sessions) = send(&app, "GET", "/study-sessions", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["subject"], "Cell Biology");
    assert_eq!(sessions[0]["difficulty"], "simple");

    let (status, results) = send(&app, "GET", "/quiz-results", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results[0]["subject"], "Cell Biology");

    let stranger = common::bearer(Uuid::new_v4());
    let uri = format!("/study-sessions/{}", session_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, results) = send(&app, "GET", "/quiz-results", Some(&bearer), None).await;
    assert!(results.as_array().unwrap().is_empty());
}
