use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "hubspot-integration-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Pronto quando o key-value store responde
pub async fn ready_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    log_health_check();

    let store_status = match state.hubspot.store().health_check().await {
        Ok(_) => "connected",
        Err(e) => {
            log_warning(&format!("⚠️ [Store] Health check falhou: {}", e));
            "disconnected"
        }
    };

    let ready = store_status == "connected";
    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status, Json(json!({
        "ready": ready,
        "service": "hubspot-integration-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "store": {
                "status": store_status,
                "backend": state.settings.store.backend
            }
        }
    })))
}
