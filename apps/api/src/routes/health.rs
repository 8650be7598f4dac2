use axum::Json;
use serde_json::{json, Value};
use tracing::info;

/// GET /
pub async fn root_handler() -> Json<Value> {
    info!("Root endpoint accessed");
    Json(json!({ "message": "Service is running" }))
}

/// GET /heartbeat
pub async fn heartbeat_handler() -> Json<Value> {
    info!("Heartbeat endpoint accessed");
    Json(json!({ "status": "OK" }))
}
