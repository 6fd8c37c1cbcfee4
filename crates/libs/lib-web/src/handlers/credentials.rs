//! # Credential Handlers
//!
//! Visibility into the Axiom session kept alive by the background refresher.
//! Responses carry expiry information only; token values are never returned.
//!
//! - `GET /api/credentials/status`
//! - `POST /api/credentials/refresh`

use crate::services::TokenService;
use axum::{extract::State, Json};
use lib_core::dto::{CredentialStatus, RefreshResponse};
use lib_solana::SolanaState;
use std::sync::Arc;
use tracing::info;

/// **Route**: `GET /api/credentials/status`
pub async fn get_status(State(solana): State<Arc<SolanaState>>) -> Json<CredentialStatus> {
    Json(TokenService::new(solana).credential_status().await)
}

/// Force a refresh now instead of waiting for the scheduler.
///
/// **Route**: `POST /api/credentials/refresh`
///
/// Always 200; `refreshed` tells whether the exchange succeeded.
pub async fn post_refresh(State(solana): State<Arc<SolanaState>>) -> Json<RefreshResponse> {
    info!("[AUTH] Manual credential refresh requested");
    Json(TokenService::new(solana).refresh_credentials().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::state_for;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use lib_solana::test_support::{MockUpstream, Scripted};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(solana: Arc<SolanaState>) -> Router {
        Router::new()
            .route("/status", get(get_status))
            .route("/refresh", post(post_refresh))
            .with_state(solana)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_status_hides_token_values() {
        // Arrange
        let mock = MockUpstream::start().await;

        // Act
        let response = app(state_for(&mock))
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["expired"], false);
        assert!(body["expires_in_secs"].as_i64().unwrap() > 800);
        assert!(body["expires_at"].is_string());
        assert!(!body.to_string().contains("seed-access"));
        assert!(!body.to_string().contains("seed-refresh"));
    }

    #[tokio::test]
    async fn test_refresh_rotates_credentials() {
        // Arrange
        let mock = MockUpstream::start().await;
        mock.refresh.push(
            Scripted::json(200, json!({}))
                .with_cookie("auth-access-token=fresh-access; Path=/; HttpOnly"),
        );
        let solana = state_for(&mock);

        // Act
        let response = app(Arc::clone(&solana))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["refreshed"], true);
        assert_eq!(body["expired"], false);
        assert_eq!(solana.credentials.get().await.access_token, "fresh-access");
        assert_eq!(mock.refresh.cookies(), vec!["auth-refresh-token=seed-refresh".to_string()]);
    }

    #[tokio::test]
    async fn test_refresh_failure_reports_false() {
        // Arrange: refresh endpoint answers 500
        let mock = MockUpstream::start().await;
        let solana = state_for(&mock);

        // Act
        let response = app(Arc::clone(&solana))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["refreshed"], false);
        assert_eq!(solana.credentials.get().await.access_token, "seed-access");
    }
}
