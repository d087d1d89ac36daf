use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Drop every cache entry (POST /api/admin/cache/flush).
///
/// A cache outage is reported as `"status": null` rather than an error,
/// since the cache is optional for correctness.
#[axum::debug_handler]
pub async fn flush_cache(State(state): State<AppState>) -> Json<Value> {
    let status = state.cache.flush_all().await;
    tracing::info!(?status, "Cache flush requested");
    Json(json!({ "status": status }))
}
