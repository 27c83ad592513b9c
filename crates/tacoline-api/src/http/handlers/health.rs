//! Liveness endpoints.

use axum::Json;
use axum::extract::State;

use tacoline_core::session::SessionStore;

use crate::state::AppState;

/// GET / - Plain-text greeting.
pub async fn home() -> &'static str {
    "Hello, this is the Tacoline LINE bot server!"
}

/// GET /health - Status, version and the number of users with a cart.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds().max(0);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "active_users": state.router.store().user_count(),
        "reply_sender": state.replies.name(),
        "uptime_secs": uptime_secs,
    }))
}
