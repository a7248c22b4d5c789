use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::history_dto::CreateQuizResultPayload;
use crate::error::{Error, Result};
use crate::models::quiz::Difficulty;
use crate::models::quiz_result::{QuizResult, QuizResultWithSession};
use crate::models::study_session::StudySession;

#[derive(Clone)]
pub struct StudyService {
    pool: PgPool,
}

impl StudyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Any write failure here is fatal to the summary request.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        subject: &str,
        difficulty: Difficulty,
        summary: &str,
    ) -> Result<StudySession> {
        sqlx::query_as::<_, StudySession>(
            r#"
            INSERT INTO study_sessions (user_id, subject, difficulty, summary)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, subject, difficulty, summary, created_at
            "#,
        )
        .bind(user_id)
        .bind(subject)
        .bind(difficulty.as_str())
        .bind(summary)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, %user_id, "Failed to save study session");
            Error::Persistence("Failed to save session".to_string())
        })
    }

    pub async fn get_owned_session(&self, user_id: Uuid, session_id: Uuid) -> Result<StudySession> {
        sqlx::query_as::<_, StudySession>(
            r#"
            SELECT id, user_id, subject, difficulty, summary, created_at
            FROM study_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Study session not found".to_string()))
    }

    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<StudySession>> {
        let sessions = sqlx::query_as::<_, StudySession>(
            r#"
            SELECT id, user_id, subject, difficulty, summary, created_at
            FROM study_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    pub async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM study_sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Study session not found".to_string()));
        }
        Ok(())
    }

    pub async fn create_quiz_result(
        &self,
        user_id: Uuid,
        payload: &CreateQuizResultPayload,
    ) -> Result<QuizResult> {
        self.get_owned_session(user_id, payload.session_id).await?;

        let score = Decimal::from_f64_retain(payload.score_percentage)
            .map(|d| d.round_dp(2))
            .ok_or_else(|| Error::BadRequest("score_percentage is not a number".to_string()))?;

        let result = sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO quiz_results (
                user_id, session_id, total_questions, correct_answers,
                score_percentage, time_taken_seconds
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, session_id, total_questions, correct_answers,
                      score_percentage, time_taken_seconds, created_at
            "#,
        )
        .bind(user_id)
        .bind(payload.session_id)
        .bind(payload.total_questions)
        .bind(payload.correct_answers)
        .bind(score)
        .bind(payload.time_taken_seconds)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, %user_id, session_id = %payload.session_id, "Failed to save quiz result");
            Error::Persistence("Failed to save quiz result".to_string())
        })?;

        Ok(result)
    }

    pub async fn list_quiz_results(&self, user_id: Uuid) -> Result<Vec<QuizResultWithSession>> {
        let results = sqlx::query_as::<_, QuizResultWithSession>(
            r#"
            SELECT qr.id, qr.session_id, qr.total_questions, qr.correct_answers,
                   qr.score_percentage, qr.time_taken_seconds, qr.created_at,
                   ss.subject, ss.difficulty
            FROM quiz_results qr
            JOIN study_sessions ss ON ss.id = qr.session_id
            WHERE qr.user_id = $1
            ORDER BY qr.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }
}
