use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::quiz_result::{QuizResult, QuizResultWithSession};
use crate::models::study_session::StudySession;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySessionResponse {
    pub id: Uuid,
    pub subject: String,
    pub difficulty: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl From<StudySession> for StudySessionResponse {
    fn from(s: StudySession) -> Self {
        Self {
            id: s.id,
            subject: s.subject,
            difficulty: s.difficulty,
            summary: s.summary,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_answer_counts"))]
pub struct CreateQuizResultPayload {
    pub session_id: Uuid,
    #[validate(range(min = 1, message = "total_questions must be positive"))]
    pub total_questions: i32,
    #[validate(range(min = 0, message = "correct_answers cannot be negative"))]
    pub correct_answers: i32,
    #[validate(range(min = 0.0, max = 100.0, message = "score_percentage must be within 0..100"))]
    pub score_percentage: f64,
    #[validate(range(min = 0, message = "time_taken_seconds cannot be negative"))]
    pub time_taken_seconds: Option<i32>,
}

fn validate_answer_counts(payload: &CreateQuizResultPayload) -> Result<(), ValidationError> {
    if payload.correct_answers > payload.total_questions {
        let mut err = ValidationError::new("answer_counts");
        err.message = Some("correct_answers cannot exceed total_questions".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResultResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score_percentage: f64,
    pub time_taken_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl From<QuizResult> for QuizResultResponse {
    fn from(r: QuizResult) -> Self {
        Self {
            id: r.id,
            session_id: r.session_id,
            total_questions: r.total_questions,
            correct_answers: r.correct_answers,
            score_percentage: r.score_percentage.to_f64().unwrap_or_default(),
            time_taken_seconds: r.time_taken_seconds,
            created_at: r.created_at,
            subject: None,
            difficulty: None,
        }
    }
}

impl From<QuizResultWithSession> for QuizResultResponse {
    fn from(r: QuizResultWithSession) -> Self {
        Self {
            id: r.id,
            session_id: r.session_id,
            total_questions: r.total_questions,
            correct_answers: r.correct_answers,
            score_percentage: r.score_percentage.to_f64().unwrap_or_default(),
            time_taken_seconds: r.time_taken_seconds,
            created_at: r.created_at,
            subject: Some(r.subject),
            difficulty: Some(r.difficulty),
        }
    }
}
