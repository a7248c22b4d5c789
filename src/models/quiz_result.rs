use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score_percentage: Decimal,
    pub time_taken_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A quiz result joined with the subject and difficulty of its session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResultWithSession {
    pub id: Uuid,
    pub session_id: Uuid,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score_percentage: Decimal,
    pub time_taken_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub subject: String,
    pub difficulty: String,
}
