pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pairing::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ai/pairings/health", get(health::pairing_health_handler))
        .route("/ai/pairings/chat", post(handlers::handle_chat))
        .route("/ai/pairings/history", get(handlers::handle_history))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::audit::PairingLogStore;
    use crate::catalog::CatalogSource;
    use crate::errors::AppError;
    use crate::llm_client::{CompletionClient, LlmError};
    use crate::models::catalog::{Cheese, Wine};
    use crate::models::pairing_log::{NewPairingLog, PairingLogRow};
    use crate::pairing::prompts::CatalogOrder;
    use crate::pairing::service::PairingService;

    struct OneOfEach;

    #[async_trait]
    impl CatalogSource for OneOfEach {
        async fn wines(&self) -> Vec<Wine> {
            vec![Wine::new("w1", "Pinot Noir Reserve 2022")]
        }

        async fn cheeses(&self) -> Vec<Cheese> {
            vec![Cheese::new("c1", "Brie de Meaux AOP")]
        }
    }

    struct Unreachable;

    #[async_trait]
    impl CompletionClient for Unreachable {
        async fn complete(&self, _: &str, _: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            })
        }
    }

    struct CannedLlm;

    #[async_trait]
    impl CompletionClient for CannedLlm {
        async fn complete(&self, _: &str, _: &str) -> Result<String, LlmError> {
            Ok(r#"{"answer":"Brie with Pinot.","recommendedWineIds":["w1"],"recommendedCheeseIds":["c1"]}"#.to_string())
        }
    }

    /// Holds history for `u-1` only; writes are accepted and dropped.
    struct SeededStore;

    #[async_trait]
    impl PairingLogStore for SeededStore {
        async fn save(&self, _: NewPairingLog) -> Result<(), AppError> {
            Ok(())
        }

        async fn recent_for_user(
            &self,
            user_id: &str,
            limit: i64,
        ) -> Result<Vec<PairingLogRow>, AppError> {
            assert_eq!(limit, 20);
            if user_id != "u-1" {
                return Ok(vec![]);
            }
            Ok(vec![PairingLogRow {
                id: Uuid::new_v4(),
                user_id: Some("u-1".to_string()),
                locale: "en".to_string(),
                source: "prompt".to_string(),
                message: "a cheese".to_string(),
                selected_wine_ids: None,
                selected_cheese_ids: None,
                answer: "Try the Brie.".to_string(),
                recommended_wine_ids: vec![],
                recommended_cheese_ids: vec!["c1".to_string()],
                created_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
            }])
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PairingLogStore for BrokenStore {
        async fn save(&self, _: NewPairingLog) -> Result<(), AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn recent_for_user(&self, _: &str, _: i64) -> Result<Vec<PairingLogRow>, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn app(llm: Arc<dyn CompletionClient>, logs: Arc<dyn PairingLogStore>) -> Router {
        let pairing = PairingService::new(
            Arc::new(OneOfEach),
            llm,
            Arc::clone(&logs),
            Arc::new(CatalogOrder),
        );
        build_router(AppState {
            pairing: Arc::new(pairing),
            logs,
        })
    }

    async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/ai/pairings/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_chat_returns_sanitized_recommendation() {
        let app = app(Arc::new(CannedLlm), Arc::new(SeededStore));
        let (status, json) = post_chat(
            app,
            json!({"message": "wine and cheese", "userId": "u-1"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["answer"], "Brie with Pinot.");
        assert_eq!(json["recommendedWineIds"], json!(["w1"]));
        assert_eq!(json["recommendedCheeseIds"], json!(["c1"]));
    }

    #[tokio::test]
    async fn test_chat_degrades_to_200_when_everything_fails() {
        let app = app(Arc::new(Unreachable), Arc::new(BrokenStore));
        let (status, json) = post_chat(app, json!({"message": "vino", "locale": "es"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["answer"],
            "Lo siento, no pude generar una recomendación en este momento."
        );
        assert_eq!(json["recommendedWineIds"], json!([]));
        assert_eq!(json["recommendedCheeseIds"], json!([]));
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let app = app(Arc::new(CannedLlm), Arc::new(SeededStore));
        let (status, json) = post_chat(app, json!({"message": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_history_lists_user_records() {
        let app = app(Arc::new(CannedLlm), Arc::new(SeededStore));
        let (status, body) = get(app, "/ai/pairings/history?userId=u-1").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["createdAt"], "2026-10-19T08:30:00Z");
        assert_eq!(items[0]["recommendedCheeseIds"], json!(["c1"]));
        assert_eq!(items[0]["userId"], "u-1");
    }

    #[tokio::test]
    async fn test_history_requires_user_id() {
        let app = app(Arc::new(CannedLlm), Arc::new(SeededStore));
        let (status, _) = get(app, "/ai/pairings/history").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_history_store_failure_is_500() {
        let app = app(Arc::new(CannedLlm), Arc::new(BrokenStore));
        let (status, body) = get(app, "/ai/pairings/history?userId=u-1").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app(Arc::new(CannedLlm), Arc::new(SeededStore));
        let (status, body) = get(app.clone(), "/ai/pairings/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK - pairing-api");

        let (status, body) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
