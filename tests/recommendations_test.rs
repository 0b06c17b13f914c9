//! Cohere client against an in-process fake of the v1 chat endpoint

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use ftth_planner::config::CohereConfig;
use ftth_planner::recommendations::{CohereClient, EXPERT_PREAMBLE, PING_MESSAGE, RecommendationEngine};
use serde_json::{Value as JsonValue, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

const API_KEY: &str = "cohere-test-key";

type Captured = Arc<Mutex<Vec<JsonValue>>>;

async fn chat(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", API_KEY));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid api token" })),
        )
            .into_response();
    }

    captured.lock().unwrap().push(body);
    Json(json!({ "text": "  1. RESUMEN EJECUTIVO: viable\n", "generation_id": "abc" }))
        .into_response()
}

async fn spawn_fake() -> (SocketAddr, Captured) {
    let captured: Captured = Arc::default();
    let app = Router::new()
        .route("/v1/chat", post(chat))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn client(addr: SocketAddr, api_key: &str) -> CohereClient {
    CohereClient::new(
        reqwest::Client::new(),
        CohereConfig {
            api_key: Some(api_key.to_string()),
            base_url: format!("http://{}/", addr),
            model: "command-r-08-2024".to_string(),
            max_tokens: 1500,
            temperature: 0.3,
        },
    )
}

#[tokio::test]
async fn test_recommend_sends_expert_request() {
    let (addr, captured) = spawn_fake().await;
    let text = client(addr, API_KEY).recommend("Analiza esta ruta").await.unwrap();

    assert_eq!(text, "1. RESUMEN EJECUTIVO: viable");

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let body = &requests[0];
    assert_eq!(body["model"], "command-r-08-2024");
    assert_eq!(body["message"], "Analiza esta ruta");
    assert_eq!(body["max_tokens"], 1500);
    assert_eq!(body["temperature"], 0.3);
    assert_eq!(body["preamble"], EXPERT_PREAMBLE);
}

#[tokio::test]
async fn test_ping_uses_short_request() {
    let (addr, captured) = spawn_fake().await;
    client(addr, API_KEY).ping().await.unwrap();

    let requests = captured.lock().unwrap();
    let body = &requests[0];
    assert_eq!(body["message"], PING_MESSAGE);
    assert_eq!(body["max_tokens"], 10);
    assert!(body.get("preamble").is_none());
}

#[tokio::test]
async fn test_rejected_key_surfaces_api_message() {
    let (addr, captured) = spawn_fake().await;
    let err = client(addr, "wrong").recommend("hola").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("401"), "unexpected error: {}", message);
    assert!(message.contains("invalid api token"), "unexpected error: {}", message);
    assert!(captured.lock().unwrap().is_empty());
}
