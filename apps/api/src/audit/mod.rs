//! Audit log of pairing interactions. Append-only: one insert per chat call,
//! read back only for the per-user history listing.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pairing_log::{NewPairingLog, PairingLogRow};

/// How many records the history endpoint returns.
pub const HISTORY_LIMIT: i64 = 20;

#[async_trait]
pub trait PairingLogStore: Send + Sync {
    /// Persists a record. The store stamps `created_at`; callers cannot set it.
    async fn save(&self, log: NewPairingLog) -> Result<(), AppError>;

    /// Most recent records for a user, newest first.
    async fn recent_for_user(&self, user_id: &str, limit: i64)
        -> Result<Vec<PairingLogRow>, AppError>;
}

#[derive(Clone)]
pub struct PgPairingLogStore {
    pool: PgPool,
}

impl PgPairingLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PairingLogStore for PgPairingLogStore {
    async fn save(&self, log: NewPairingLog) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO pairing_logs
                (id, user_id, locale, source, message, selected_wine_ids, selected_cheese_ids,
                 answer, recommended_wine_ids, recommended_cheese_ids, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&log.user_id)
        .bind(&log.locale)
        .bind(log.source)
        .bind(&log.message)
        .bind(&log.selected_wine_ids)
        .bind(&log.selected_cheese_ids)
        .bind(&log.answer)
        .bind(&log.recommended_wine_ids)
        .bind(&log.recommended_cheese_ids)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent_for_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<PairingLogRow>, AppError> {
        let rows = sqlx::query_as::<_, PairingLogRow>(
            r#"
            SELECT * FROM pairing_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
