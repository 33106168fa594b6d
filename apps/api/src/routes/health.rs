use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and whether resume search is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let resume_search = if state.xray.is_some() {
        "configured"
    } else {
        "needs_setup"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "candidate-search",
        "resumeSearch": resume_search,
        "redisCache": state.config.redis_url.is_some(),
    }))
}
