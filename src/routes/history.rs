use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        auth_dto::MessageResponse,
        history_dto::{CreateQuizResultPayload, QuizResultResponse, StudySessionResponse},
    },
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/study-sessions",
    responses(
        (status = 200, description = "Caller's study sessions, newest first", body = Vec<StudySessionResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_study_sessions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let sessions = state.study_service.list_sessions(claims.sub).await?;
    let items: Vec<StudySessionResponse> = sessions.into_iter().map(Into::into).collect();
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/study-sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Study session ID")
    ),
    responses(
        (status = 200, description = "Session deleted"),
        (status = 404, description = "Study session not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_study_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.study_service.delete_session(claims.sub, id).await?;
    Ok(Json(MessageResponse::new("Session deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/quiz-results",
    request_body = CreateQuizResultPayload,
    responses(
        (status = 201, description = "Quiz result recorded", body = QuizResultResponse),
        (status = 400, description = "Inconsistent counts or score"),
        (status = 404, description = "Study session not found")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizResultPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .study_service
        .create_quiz_result(claims.sub, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(QuizResultResponse::from(result))))
}

#[utoipa::path(
    get,
    path = "/quiz-results",
    responses(
        (status = 200, description = "Caller's quiz results with session subject", body = Vec<QuizResultResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_quiz_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let results = state.study_service.list_quiz_results(claims.sub).await?;
    let items: Vec<QuizResultResponse> = results.into_iter().map(Into::into).collect();
    Ok(Json(items))
}
