use super::*;
use crate::test_helpers::{state_for, MINT};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use lib_solana::test_support::{asset_result, holders_result, market_item, MockUpstream, Scripted};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(solana: Arc<SolanaState>) -> Router {
    Router::new()
        .route("/api/token/details", post(post_token_details))
        .route("/api/token/{address}", get(get_token_details))
        .route("/api/token/{address}/chart", get(get_chart_data))
        .with_state(solana)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_details(address: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/token/details")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "token_address": address }).to_string()))
        .unwrap()
}

// ========== Token Details Tests ==========

#[tokio::test]
async fn test_post_token_details_merged_record() {
    // Arrange
    let mock = MockUpstream::start().await;
    mock.asset.push(Scripted::rpc_result(asset_result("Bonk", "BONK", 1_000_000_000.0, 6)));
    mock.holders.push(Scripted::rpc_result(holders_result(&[250.0, 100.0])));
    mock.trending.push(Scripted::json(200, json!([market_item(MINT, "Bonk", "BONK")])));

    // Act
    let response = app(state_for(&mock)).oneshot(post_details(MINT)).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["token_address"], MINT);
    assert_eq!(record["name"], "Bonk");
    assert_eq!(record["holders"], 2);
    assert_eq!(record["total_supply"], 1000.0);
    assert_eq!(record["top_holders_percentage"], 35.0);
    assert_eq!(record["marketCapSol"], 420.5);
    assert_eq!(record["twitter"], "https://x.com/BONK");
    assert!(record.get("error").is_none());
}

#[tokio::test]
async fn test_post_token_details_all_sources_down_still_200() {
    // Arrange: every upstream answers 500
    let mock = MockUpstream::start().await;

    // Act
    let response = app(state_for(&mock)).oneshot(post_details(MINT)).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["name"], "UNKNOWN");
    assert_eq!(record["description"], "N/A");
    assert_eq!(record["error"], "Failed to fetch token details");
}

#[tokio::test]
async fn test_post_token_details_invalid_address() {
    // Arrange
    let mock = MockUpstream::start().await;

    // Act
    let response = app(state_for(&mock))
        .oneshot(post_details("0OIl-not-base58"))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "InvalidInput");
    assert_eq!(mock.asset.hits(), 0);
}

#[tokio::test]
async fn test_post_token_details_missing_field() {
    // Arrange
    let mock = MockUpstream::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/token/details")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    // Act
    let response = app(state_for(&mock)).oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_token_details_market_only() {
    // Arrange: Helius down, feed up
    let mock = MockUpstream::start().await;
    mock.trending.push(Scripted::json(200, json!([market_item(MINT, "Bonk", "BONK")])));

    // Act
    let response = app(state_for(&mock))
        .oneshot(
            Request::builder()
                .uri(format!("/api/token/{}", MINT))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["symbol"], "BONK");
    assert_eq!(record["total_supply"], 1_000_000_000.0);
    assert_eq!(record["top_holders_percentage"], 18.5);
    assert_eq!(record["holders"], 0);
}

// ========== Chart Tests ==========

#[tokio::test]
async fn test_get_chart_data_empty_series() {
    // Arrange
    let mock = MockUpstream::start().await;

    // Act
    let response = app(state_for(&mock))
        .oneshot(
            Request::builder()
                .uri(format!("/api/token/{}/chart", MINT))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"token_address": MINT, "prices": []}));
}
