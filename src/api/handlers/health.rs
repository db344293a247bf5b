use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Health check with the configured model
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "llm": {
            "provider": state.config.llm.provider,
            "model": state.config.llm.model(),
        },
    }))
}
