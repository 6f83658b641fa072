use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use prompt_forge_core::config::ModelGatewayConfig;
use prompt_forge_core::traits::{CompletionClient, ModelCatalog};
use prompt_forge_core::types::{ChatCompletionRequest, ChatMessage};
use prompt_forge_core::Error;
use prompt_forge_model_gateway::{CachedCatalog, OpenRouterClient};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub answers and what it saw.
#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn chat(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.seen.lock().unwrap().push((headers, body));
    (stub.status, Json(stub.body.clone()))
}

async fn models(State(stub): State<Stub>) -> (StatusCode, Json<Value>) {
    (stub.status, Json(stub.body.clone()))
}

async fn spawn_stub(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<(HeaderMap, Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/api/v1/chat/completions", post(chat))
        .route("/api/v1/models", get(models))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/v1", addr), seen)
}

fn client(base_url: &str, api_key: Option<&str>) -> OpenRouterClient {
    OpenRouterClient::new(&ModelGatewayConfig {
        base_url: base_url.to_string(),
        api_key: api_key.map(|k| Secret::new(k.to_string())),
        referer: "http://localhost:3000".into(),
        title: "Prompt Forge".into(),
        request_timeout_secs: 5,
        catalog_ttl_secs: 0,
    })
    .unwrap()
}

fn request() -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        "meta-llama/llama-3.3-70b-instruct:free",
        vec![ChatMessage::system("sys"), ChatMessage::user("usr")],
    )
    .with_temperature(0.4)
    .with_max_tokens(1200)
}

#[tokio::test]
async fn test_completion_success_sends_headers_and_body() {
    let (base, seen) = spawn_stub(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "role": "assistant", "content": "{\"enhanced_prompt\":\"x\"}" } }] }),
    )
    .await;

    let text = client(&base, Some("sk-or-test"))
        .create_chat_completion(&request())
        .await
        .unwrap();
    assert_eq!(text, "{\"enhanced_prompt\":\"x\"}");

    let seen = seen.lock().unwrap();
    let (headers, body) = &seen[0];
    assert_eq!(headers["authorization"], "Bearer sk-or-test");
    assert_eq!(headers["http-referer"], "http://localhost:3000");
    assert_eq!(headers["x-title"], "Prompt Forge");
    assert_eq!(body["model"], "meta-llama/llama-3.3-70b-instruct:free");
    assert_eq!(body["max_tokens"], 1200);
    assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    assert_eq!(body["messages"][0], json!({ "role": "system", "content": "sys" }));
    assert_eq!(body["messages"][1], json!({ "role": "user", "content": "usr" }));
}

#[tokio::test]
async fn test_missing_key_omits_authorization() {
    let (base, seen) = spawn_stub(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": "ok" } }] }),
    )
    .await;

    client(&base, None).create_chat_completion(&request()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen[0].0.get("authorization").is_none());
}

#[tokio::test]
async fn test_non_success_status_is_unavailable() {
    let (base, _) = spawn_stub(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "rate limited" } }),
    )
    .await;

    let err = client(&base, Some("k"))
        .create_chat_completion(&request())
        .await
        .unwrap_err();

    match err {
        Error::UpstreamUnavailable(msg) => {
            assert!(msg.starts_with("OpenRouter API error: 429"), "{}", msg);
            assert!(msg.contains("rate limited"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_payload_with_ok_status_is_unavailable() {
    let (base, _) = spawn_stub(
        StatusCode::OK,
        json!({ "error": { "message": "model not found", "code": 404 } }),
    )
    .await;

    let err = client(&base, Some("k"))
        .create_chat_completion(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable(ref m) if m == "OpenRouter API error: model not found"));
}

#[tokio::test]
async fn test_empty_content_is_malformed() {
    let (base, _) = spawn_stub(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "content": "" } }] }),
    )
    .await;

    let err = client(&base, Some("k"))
        .create_chat_completion(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamMalformed(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_unreachable_upstream_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/api/v1", addr), Some("k"))
        .create_chat_completion(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable(ref m) if m.starts_with("OpenRouter request failed")));
}

#[tokio::test]
async fn test_free_models_filtering() {
    let (base, _) = spawn_stub(
        StatusCode::OK,
        json!({ "data": [
            { "id": "a:free", "name": "A", "context_length": 8192,
              "pricing": { "prompt": "0", "completion": "0", "request": "0" } },
            { "id": "b", "name": "B",
              "pricing": { "prompt": "0.000001", "completion": "0.000002" } },
            { "id": "c", "name": "C",
              "pricing": { "prompt": "0", "completion": "0.000002" } },
            { "id": "d", "name": "D",
              "pricing": { "prompt": "n/a", "completion": "0" } }
        ] }),
    )
    .await;

    let client = client(&base, Some("k"));
    assert_eq!(client.list_models().await.unwrap().len(), 4);

    let free = client.free_models().await.unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].id, "a:free");
    assert_eq!(free[0].context_length, Some(8192));
}

#[tokio::test]
async fn test_models_non_success_is_unavailable() {
    let (base, _) = spawn_stub(StatusCode::BAD_GATEWAY, json!({})).await;
    let err = client(&base, Some("k")).list_models().await.unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_cached_catalog_over_http() {
    let (base, _) = spawn_stub(
        StatusCode::OK,
        json!({ "data": [{ "id": "a:free", "name": "A", "pricing": { "prompt": "0", "completion": "0" } }] }),
    )
    .await;

    let cached = CachedCatalog::new(client(&base, None)).with_ttl(Duration::from_secs(60));
    assert_eq!(cached.free_models().await.unwrap().len(), 1);
    assert_eq!(cached.free_models().await.unwrap().len(), 1);
}
