use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub difficulty: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
