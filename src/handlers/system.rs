use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "SIWE Profile API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "profile": "PATCH /api/profile (SIWE session cookie)",
        }
    }))
}

/// GET /health - liveness plus a ping through each credential tier
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let user_tier = state.users.ping().await;
    let service_tier = state.profiles.ping().await;

    let describe = |result: &Result<(), crate::database::DatabaseError>| match result {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("Health check database error: {}", e);
            e.to_string()
        }
    };

    let healthy = user_tier.is_ok() && service_tier.is_ok();
    let body = json!({
        "status": if healthy { "ok" } else { "degraded" },
        "timestamp": now,
        "database": {
            "user": describe(&user_tier),
            "service": describe(&service_tier),
        }
    });

    if healthy {
        (StatusCode::OK, Json(body))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(body))
    }
}
