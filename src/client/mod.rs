//! Typed client for the HTTP API.
//!
//! The client holds no session state. Authenticated calls take an explicit
//! [`Credential`]; keeping it between runs is the job of a [`TokenStore`].

pub mod quiz;
pub mod token_store;

use std::fmt;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use url::Url;
use uuid::Uuid;

use crate::dto::auth_dto::{AuthResponse, SignupPayload, UserResponse};
use crate::dto::generation_dto::{QuizResponse, SummaryResponse};
use crate::dto::history_dto::{CreateQuizResultPayload, QuizResultResponse, StudySessionResponse};
use crate::models::quiz::{Difficulty, Language};

pub use quiz::{complete_quiz, QuestionReview, QuizOutcome, QuizScore};
pub use token_store::{AuthSession, FileTokenStore, MemoryTokenStore, TokenStore};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Not signed in")]
    MissingCredential,

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// A bearer token. Debug output never shows the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&AuthResponse> for Credential {
    fn from(auth: &AuthResponse) -> Self {
        Credential::bearer(auth.access_token.clone())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.http.request(method, url))
    }

    fn authed(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
    ) -> ClientResult<RequestBuilder> {
        Ok(self.request(method, path)?.bearer_auth(credential.token()))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let res = builder.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body: JsonValue = res.json().await.unwrap_or(JsonValue::Null);
            let message = body
                .get("error")
                .or_else(|| body.get("detail"))
                .and_then(JsonValue::as_str)
                .unwrap_or("Request failed")
                .to_string();
            return Err(ClientError::Api { status, message });
        }
        Ok(res.json().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: &B,
    ) -> ClientResult<T> {
        self.send(builder.json(body)).await
    }

    pub async fn signup(&self, payload: &SignupPayload) -> ClientResult<AuthResponse> {
        self.send_json(self.request(Method::POST, "auth/signup")?, payload)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = json!({ "email": email, "password": password });
        self.send_json(self.request(Method::POST, "auth/login")?, &body)
            .await
    }

    pub async fn logout(&self, credential: &Credential) -> ClientResult<()> {
        let _: JsonValue = self
            .send(self.authed(Method::POST, "auth/logout", credential)?)
            .await?;
        Ok(())
    }

    pub async fn current_user(&self, credential: &Credential) -> ClientResult<UserResponse> {
        self.send(self.authed(Method::GET, "auth/user", credential)?)
            .await
    }

    pub async fn generate_summary(
        &self,
        credential: &Credential,
        subject: &str,
        difficulty: Difficulty,
        language: Language,
    ) -> ClientResult<SummaryResponse> {
        let body = json!({
            "subject": subject,
            "difficulty": difficulty.as_str(),
            "language": language.as_str(),
        });
        self.send_json(
            self.authed(Method::POST, "generate-summary", credential)?,
            &body,
        )
        .await
    }

    pub async fn generate_quiz(
        &self,
        credential: &Credential,
        subject: &str,
        session_id: Uuid,
        language: Language,
    ) -> ClientResult<QuizResponse> {
        let body = json!({
            "subject": subject,
            "sessionId": session_id,
            "language": language.as_str(),
        });
        self.send_json(self.authed(Method::POST, "generate-quiz", credential)?, &body)
            .await
    }

    pub async fn study_sessions(
        &self,
        credential: &Credential,
    ) -> ClientResult<Vec<StudySessionResponse>> {
        self.send(self.authed(Method::GET, "study-sessions", credential)?)
            .await
    }

    pub async fn delete_study_session(
        &self,
        credential: &Credential,
        session_id: Uuid,
    ) -> ClientResult<()> {
        let path = format!("study-sessions/{}", session_id);
        let _: JsonValue = self
            .send(self.authed(Method::DELETE, &path, credential)?)
            .await?;
        Ok(())
    }

    pub async fn save_quiz_result(
        &self,
        credential: &Credential,
        payload: &CreateQuizResultPayload,
    ) -> ClientResult<QuizResultResponse> {
        self.send_json(self.authed(Method::POST, "quiz-results", credential)?, payload)
            .await
    }

    pub async fn quiz_results(
        &self,
        credential: &Credential,
    ) -> ClientResult<Vec<QuizResultResponse>> {
        self.send(self.authed(Method::GET, "quiz-results", credential)?)
            .await
    }
}
