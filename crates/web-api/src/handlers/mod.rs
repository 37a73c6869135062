pub mod broker;
pub mod market;
pub mod positions;
pub mod token_monitor;

use axum::Json;
use serde_json::{json, Value};

/// Simple liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
