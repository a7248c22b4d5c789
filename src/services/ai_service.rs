use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::dto::generation_dto::SummaryRequest;
use crate::error::{Error, Result};
use crate::models::quiz::{Language, QuizSet};
use crate::services::prompt_builder::{quiz_prompt, summary_prompt, Prompt};
use crate::services::response_validator::{accept_summary, parse_quiz};

/// A text-completion provider. One call, one prompt, raw text back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// OpenAI-compatible `/chat/completions` gateway.
#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiGateway {
    pub fn new(
        client: Client,
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiGateway {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let payload = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            tracing::error!(%status, error = %text, "AI provider returned an error");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::UpstreamAuth(format!("AI provider responded {}", status))
                }
                _ => Error::Upstream(format!("AI provider responded {}", status)),
            });
        }

        let body: ChatResponse = res.json().await.map_err(|e| {
            tracing::error!(error = %e, "AI provider response could not be decoded");
            Error::Upstream("AI provider returned no completion".to_string())
        })?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Upstream("AI provider returned no completion".to_string()))
    }
}

#[derive(Clone)]
pub struct AIService {
    gateway: Arc<dyn ChatCompletion>,
}

impl AIService {
    pub fn new(gateway: Arc<dyn ChatCompletion>) -> Self {
        Self { gateway }
    }

    pub async fn generate_summary(&self, request: &SummaryRequest) -> Result<String> {
        tracing::info!(
            difficulty = %request.difficulty,
            language = request.language.as_str(),
            subject_chars = request.subject.chars().count(),
            "Generating study summary"
        );
        let prompt = summary_prompt(&request.subject, request.difficulty, request.language);
        let raw = self
            .gateway
            .complete(&prompt)
            .await
            .map_err(|e| generic_upstream(e, "Failed to generate summary"))?;
        accept_summary(&raw)
    }

    pub async fn generate_quiz(&self, subject: &str, language: Language) -> Result<QuizSet> {
        tracing::info!(
            language = language.as_str(),
            subject_chars = subject.chars().count(),
            "Generating quiz"
        );
        let prompt = quiz_prompt(subject, language);
        let raw = self
            .gateway
            .complete(&prompt)
            .await
            .map_err(|e| generic_upstream(e, "Failed to generate quiz"))?;
        parse_quiz(&raw)
    }
}

fn generic_upstream(err: Error, message: &str) -> Error {
    match err {
        Error::Upstream(detail) => {
            tracing::error!(%detail, "{}", message);
            Error::Upstream(message.to_string())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::Difficulty;
    use serde_json::json;

    fn quiz_json(count: usize) -> String {
        let questions: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("Question {}", i),
                    "options": ["a", "b", "c", "d"],
                    "correct": i % 4,
                    "explanation": "Because."
                })
            })
            .collect();
        json!({ "questions": questions }).to_string()
    }

    fn service(mock: MockChatCompletion) -> AIService {
        AIService::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn quiz_generation_passes_validated_set_through() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .withf(|p: &Prompt| {
                p.user == "Generate 5 quiz questions about: Thermodynamics"
                    && !p.system.contains("Thermodynamics")
            })
            .times(1)
            .returning(|_| Ok(format!("```json\n{}\n```", quiz_json(5))));

        let set = service(mock)
            .generate_quiz("Thermodynamics", Language::En)
            .await
            .unwrap();
        assert_eq!(set.questions().len(), 5);
    }

    #[tokio::test]
    async fn quiz_generation_fails_closed_on_short_set() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Ok(quiz_json(4)));

        let err = service(mock)
            .generate_quiz("Thermodynamics", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGeneration(_)));
    }

    #[tokio::test]
    async fn upstream_failure_becomes_generic_message() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .returning(|_| Err(Error::Upstream("AI provider responded 500".into())));

        let request = SummaryRequest {
            subject: "Optics".into(),
            difficulty: Difficulty::Simple,
            language: Language::En,
        };
        match service(mock).generate_summary(&request).await {
            Err(Error::Upstream(msg)) => assert_eq!(msg, "Failed to generate summary"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn upstream_auth_error_is_preserved() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .returning(|_| Err(Error::UpstreamAuth("AI provider responded 401".into())));

        let err = service(mock)
            .generate_quiz("Optics", Language::Bg)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamAuth(_)));
    }

    #[tokio::test]
    async fn summary_text_is_returned_verbatim() {
        let mut mock = MockChatCompletion::new();
        mock.expect_complete()
            .withf(|p: &Prompt| p.user == "Create a normal level study summary for: Optics")
            .returning(|_| Ok("## Optics\n\n- **Refraction**".to_string()));

        let request = SummaryRequest {
            subject: "Optics".into(),
            difficulty: Difficulty::Normal,
            language: Language::En,
        };
        let summary = service(mock).generate_summary(&request).await.unwrap();
        assert_eq!(summary, "## Optics\n\n- **Refraction**");
    }
}
