use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::SignupPayload;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn signup(&self, payload: &SignupPayload) -> Result<User> {
        let password_hash = hash_password(&payload.password)?;
        let full_name = payload
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, full_name, created_at, updated_at
            "#,
        )
        .bind(normalize_email(&payload.email))
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::BadRequest("Email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(Error::Unauthorized("Invalid email or password".to_string())),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("User not found".to_string()))
    }
}
