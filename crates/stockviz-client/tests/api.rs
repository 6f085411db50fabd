// File: crates/stockviz-client/tests/api.rs
// Purpose: Exercise the client against a local axum backend on an ephemeral port.

use std::collections::HashMap;

use axum::extract::{Query, RawQuery};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use stockviz_client::{ApiClient, ClientConfig, DataSource, FetchError, StockQuery};

async fn history(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    match q.get("symbol").map(String::as_str) {
        Some("FAIL") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        Some("ERR") => Json(json!({"error": "Không tìm thấy mã cổ phiếu"})).into_response(),
        Some("NOERR") => Json(json!({"error": null, "line": [{"time": 1704153600, "value": 1.0}]})).into_response(),
        Some("GARBAGE") => (StatusCode::OK, "not json").into_response(),
        Some("BADCOLOR") => {
            Json(json!({"volume": [{"time": "2024-01-02", "value": 1.0, "color": "#é1"}]})).into_response()
        }
        _ => Json(json!({
            "line": [{"time": "2024-01-02", "value": 10.5}, {"time": "2024-01-03", "value": 11.0}],
            "candle": [{"time": "2024-01-02", "open": 10.0, "high": 11.0, "low": 9.5, "close": 10.5}],
            "volume": [{"time": "2024-01-02", "value": 12000, "color": "rgba(0, 150, 136, 0.8)"}]
        }))
        .into_response(),
    }
}

async fn echo(RawQuery(raw): RawQuery) -> Json<Value> {
    Json(json!({ "query": raw }))
}

async fn shareholders() -> Json<Value> {
    Json(json!({"shareholders": [{"category": "Nhà nước", "value": 51.2}, {"category": "Khác", "value": 48.8}]}))
}

async fn spawn_backend() -> ApiClient {
    let app = Router::new()
        .route("/api/stock/history", get(history))
        .route("/api/stock/shareholders", get(shareholders))
        .route("/api/echo", get(echo));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    ApiClient::new(&ClientConfig::new(format!("http://{addr}"))).expect("client")
}

#[tokio::test]
async fn decodes_history_payload() {
    let client = spawn_backend().await;
    let payload = client.history(&StockQuery::new("ABC")).await.expect("history");
    assert_eq!(payload.line.len(), 2);
    assert_eq!(payload.candle[0].close, 10.5);
    assert_eq!(payload.volume[0].value, 12000.0);
    assert!(payload.volume[0].color.is_some());
}

#[tokio::test]
async fn absent_params_are_not_sent() {
    let client = spawn_backend().await;
    let params = StockQuery::new("ABC").params();
    let v: Value = client.fetch_json("echo", &params).await.expect("echo");
    assert_eq!(v["query"], json!("symbol=ABC"));

    let q = StockQuery::new("ABC").with_start(NaiveDate::from_ymd_opt(2023, 5, 7));
    let v: Value = client.fetch_json("echo", &q.params()).await.expect("echo");
    assert_eq!(v["query"], json!("symbol=ABC&start_date=2023-05-07"));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let client = spawn_backend().await;
    let err = client.history(&StockQuery::new("FAIL")).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(500)), "got {err:?}");
    assert_eq!(err.to_string(), "HTTP 500");

    let err = client.fetch_json::<Value>("missing", &[]).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(404)), "got {err:?}");
}

#[tokio::test]
async fn error_field_is_an_error_when_truthy() {
    let client = spawn_backend().await;
    let err = client.history(&StockQuery::new("ERR")).await.unwrap_err();
    assert_eq!(err.to_string(), "Không tìm thấy mã cổ phiếu");

    let ok = client.history(&StockQuery::new("NOERR")).await.expect("null error is fine");
    assert_eq!(ok.line.len(), 1);
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let client = spawn_backend().await;
    let err = client.history(&StockQuery::new("GARBAGE")).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn non_ascii_bar_color_is_a_decode_error() {
    let client = spawn_backend().await;
    let err = client.history(&StockQuery::new("BADCOLOR")).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn data_source_trait_object() {
    let client = spawn_backend().await;
    let source: std::sync::Arc<dyn DataSource> = std::sync::Arc::new(client);
    let payload = source.shareholders(&StockQuery::new("ABC")).await.expect("shareholders");
    assert_eq!(payload.shareholders.len(), 2);
    assert_eq!(payload.shareholders[0].category, "Nhà nước");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = ApiClient::new(&ClientConfig::new(format!("http://{addr}"))).expect("client");
    let err = client.history(&StockQuery::new("ABC")).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[test]
fn config_defaults() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.base_url, "http://127.0.0.1:5000");
    assert_eq!(cfg.timeout_secs, None);
    let cfg: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:5000");
    assert_eq!(cfg.timeout_secs, Some(5));
}
