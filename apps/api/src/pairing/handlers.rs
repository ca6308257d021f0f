//! Axum route handlers for the pairing API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::audit::HISTORY_LIMIT;
use crate::errors::AppError;
use crate::models::pairing::{PairingRequest, PairingResponse};
use crate::models::pairing_log::PairingHistoryItem;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: String,
}

/// POST /ai/pairings/chat
///
/// Always 200 once the request is valid: catalog, model, and audit failures
/// degrade to a best-effort answer.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<PairingRequest>,
) -> Result<Json<PairingResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    Ok(Json(state.pairing.chat(request).await))
}

/// GET /ai/pairings/history?userId=<id>
///
/// Last 20 interactions for the user, newest first.
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<PairingHistoryItem>>, AppError> {
    let rows = state
        .logs
        .recent_for_user(&params.user_id, HISTORY_LIMIT)
        .await?;

    Ok(Json(rows.into_iter().map(PairingHistoryItem::from).collect()))
}
