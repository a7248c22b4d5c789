use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::generation_dto::{
        GenerateQuizPayload, GenerateSummaryPayload, QuizResponse, SummaryResponse,
    },
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/generate-summary",
    request_body = GenerateSummaryPayload,
    responses(
        (status = 200, description = "Summary generated and session saved", body = SummaryResponse),
        (status = 400, description = "Invalid subject, difficulty or language"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 502, description = "AI provider failed")
    )
)]
#[axum::debug_handler]
pub async fn generate_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GenerateSummaryPayload>,
) -> Result<impl IntoResponse> {
    let request = payload.into_request()?;
    let summary = state.ai_service.generate_summary(&request).await?;
    let session = state
        .study_service
        .create_session(claims.sub, &request.subject, request.difficulty, &summary)
        .await?;

    tracing::info!(user_id = %claims.sub, session_id = %session.id, "Study session created");
    Ok(Json(SummaryResponse {
        summary,
        session_id: session.id,
    }))
}

#[utoipa::path(
    post,
    path = "/generate-quiz",
    request_body = GenerateQuizPayload,
    responses(
        (status = 200, description = "Five validated questions", body = QuizResponse),
        (status = 400, description = "Invalid subject, session id or language"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Study session not found"),
        (status = 502, description = "AI provider failed or returned a malformed quiz")
    )
)]
#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GenerateQuizPayload>,
) -> Result<impl IntoResponse> {
    let request = payload.into_request()?;
    state
        .study_service
        .get_owned_session(claims.sub, request.session_id)
        .await?;

    let quiz = state
        .ai_service
        .generate_quiz(&request.subject, request.language)
        .await?;
    Ok(Json(QuizResponse {
        questions: quiz.into_questions(),
    }))
}
