pub mod auth;
pub mod generation;
pub mod health;
pub mod history;
pub mod proxy;

use axum::{
    routing::{any, delete, get, post},
    Router,
};

use crate::middleware::{auth::require_bearer_auth, cors::permissive_cors};
use crate::AppState;

/// Full application router. The proxy sets its own CORS headers so it sits
/// outside the shared CORS layer.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/generate-summary", post(generation::generate_summary))
        .route("/generate-quiz", post(generation::generate_quiz))
        .route("/auth/user", get(auth::current_user))
        .route("/study-sessions", get(history::list_study_sessions))
        .route("/study-sessions/:id", delete(history::delete_study_session))
        .route(
            "/quiz-results",
            get(history::list_quiz_results).post(history::create_quiz_result),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    let api = Router::new()
        .route("/health", get(health::health))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(protected)
        .layer(permissive_cors());

    Router::new()
        .route("/proxy", any(proxy::proxy))
        .merge(api)
        .with_state(state)
}
