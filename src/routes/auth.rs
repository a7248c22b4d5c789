use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, MessageResponse, SignupPayload, UserResponse},
    error::Result,
    middleware::auth::Claims,
    models::user::User,
    utils::token::issue_access_token,
    AppState,
};

fn auth_response(state: &AppState, user: User) -> Result<AuthResponse> {
    let access_token = issue_access_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
    )?;
    Ok(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserResponse::from(user),
    })
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupPayload,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid payload or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.signup(&payload).await?;
    Ok(Json(auth_response(&state, user)?))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(auth_response(&state, user)?))
}

/// Tokens are stateless; logging out is the client dropping its credential.
#[axum::debug_handler]
pub async fn logout() -> impl IntoResponse {
    Json(MessageResponse::new("Logged out successfully"))
}

#[utoipa::path(
    get,
    path = "/auth/user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_by_id(claims.sub).await?;
    Ok(Json(UserResponse::from(user)))
}
