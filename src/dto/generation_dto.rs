use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::quiz::{Difficulty, Language, QuizQuestion};
use crate::utils::validation::{
    validate_difficulty, validate_language, validate_subject_charset, validate_uuid,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateSummaryPayload {
    #[validate(
        required(message = "Subject and difficulty are required"),
        length(min = 3, max = 500, message = "Subject must be between 3 and 500 characters"),
        custom(function = "validate_subject_charset")
    )]
    pub subject: Option<String>,
    #[validate(
        required(message = "Subject and difficulty are required"),
        custom(function = "validate_difficulty")
    )]
    pub difficulty: Option<String>,
    #[validate(custom(function = "validate_language"))]
    pub language: Option<String>,
}

/// A summary request that passed validation.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub subject: String,
    pub difficulty: Difficulty,
    pub language: Language,
}

impl GenerateSummaryPayload {
    pub fn into_request(mut self) -> Result<SummaryRequest> {
        self.subject = self.subject.map(|s| s.trim().to_string());
        self.validate()?;

        Ok(SummaryRequest {
            subject: self.subject.unwrap_or_default(),
            difficulty: self
                .difficulty
                .unwrap_or_default()
                .parse()
                .map_err(Error::BadRequest)?,
            language: parse_language(self.language.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateQuizPayload {
    #[validate(
        required(message = "Subject and sessionId are required"),
        length(min = 3, max = 500, message = "Subject must be between 3 and 500 characters"),
        custom(function = "validate_subject_charset")
    )]
    pub subject: Option<String>,
    #[serde(rename = "sessionId", alias = "session_id")]
    #[validate(
        required(message = "Subject and sessionId are required"),
        custom(function = "validate_uuid")
    )]
    pub session_id: Option<String>,
    #[validate(custom(function = "validate_language"))]
    pub language: Option<String>,
}

/// A quiz request that passed validation.
#[derive(Debug, Clone)]
pub struct QuizRequest {
    pub subject: String,
    pub session_id: Uuid,
    pub language: Language,
}

impl GenerateQuizPayload {
    pub fn into_request(mut self) -> Result<QuizRequest> {
        self.subject = self.subject.map(|s| s.trim().to_string());
        self.validate()?;

        let session_id = self.session_id.unwrap_or_default();
        Ok(QuizRequest {
            subject: self.subject.unwrap_or_default(),
            session_id: Uuid::parse_str(session_id.trim())
                .map_err(|e| Error::BadRequest(e.to_string()))?,
            language: parse_language(self.language.as_deref())?,
        })
    }
}

fn parse_language(raw: Option<&str>) -> Result<Language> {
    raw.map(str::parse::<Language>)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(Error::BadRequest)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    #[serde(rename = "sessionId", alias = "session_id")]
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}
