use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::pairing::{PairingRequest, PairingResponse};

/// Every interaction logged today comes from the free-text chat.
pub const SOURCE_PROMPT: &str = "prompt";

/// A persisted audit record. Rows are append-only: never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PairingLogRow {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub locale: String,
    pub source: String,
    pub message: String,
    pub selected_wine_ids: Option<Vec<String>>,
    pub selected_cheese_ids: Option<Vec<String>>,
    pub answer: String,
    pub recommended_wine_ids: Vec<String>,
    pub recommended_cheese_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit record awaiting insertion. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPairingLog {
    pub user_id: Option<String>,
    pub locale: String,
    pub source: &'static str,
    pub message: String,
    pub selected_wine_ids: Option<Vec<String>>,
    pub selected_cheese_ids: Option<Vec<String>>,
    pub answer: String,
    pub recommended_wine_ids: Vec<String>,
    pub recommended_cheese_ids: Vec<String>,
}

impl NewPairingLog {
    /// Raw inputs plus the exact response returned to the caller.
    pub fn from_exchange(request: &PairingRequest, response: &PairingResponse) -> Self {
        Self {
            user_id: request.user_id.clone(),
            locale: request.locale().to_string(),
            source: SOURCE_PROMPT,
            message: request.message.clone(),
            selected_wine_ids: request.selected_wine_ids.clone(),
            selected_cheese_ids: request.selected_cheese_ids.clone(),
            answer: response.answer.clone(),
            recommended_wine_ids: response.recommended_wine_ids.clone(),
            recommended_cheese_ids: response.recommended_cheese_ids.clone(),
        }
    }
}

/// History projection returned to the BFF.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingHistoryItem {
    pub user_id: Option<String>,
    pub locale: String,
    pub source: String,
    pub message: String,
    pub selected_wine_ids: Option<Vec<String>>,
    pub selected_cheese_ids: Option<Vec<String>>,
    pub answer: String,
    pub recommended_wine_ids: Vec<String>,
    pub recommended_cheese_ids: Vec<String>,
    /// ISO-8601 UTC, e.g. `2026-10-19T08:30:00.123Z`.
    pub created_at: String,
}

impl From<PairingLogRow> for PairingHistoryItem {
    fn from(row: PairingLogRow) -> Self {
        Self {
            user_id: row.user_id,
            locale: row.locale,
            source: row.source,
            message: row.message,
            selected_wine_ids: row.selected_wine_ids,
            selected_cheese_ids: row.selected_cheese_ids,
            answer: row.answer,
            recommended_wine_ids: row.recommended_wine_ids,
            recommended_cheese_ids: row.recommended_cheese_ids,
            created_at: row.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}
