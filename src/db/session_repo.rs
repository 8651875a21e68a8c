// src/db/session_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{common::error::AppError, services::session_cleanup::SessionStore};

// Sessões de login (tabela 'user_sessions'). Quem cria é o serviço de
// identidade; aqui só removemos as expiradas.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.delete_expired(now).await
    }
}
