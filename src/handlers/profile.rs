// handlers/profile.rs - PATCH /api/profile handler

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::ProfileChanges;
use crate::error::ApiError;

pub const MISSING_SESSION: &str = "Unauthorized - Missing SIWE session";
pub const USER_MAPPING_FAILED: &str = "Unauthorized - User mapping failed";
pub const NO_VALID_FIELDS: &str = "No valid fields provided for update";
pub const UPDATE_FAILED: &str = "Failed to update profile";
pub const UPDATE_SUCCEEDED: &str = "Profile updated successfully";

/**
 * PATCH /api/profile - Update the signed-in user's profile
 *
 * The session cookie proves an address; the address resolves to exactly one
 * user id; only that row is written. Nothing in the body can select the row.
 *
 * Expected Input:
 * ```json
 * {
 *   "display_name": "string",
 *   "bio": "string",
 *   "location": "string",
 *   "avatar_url": "string",
 *   "header_url": "string"
 * }
 * ```
 * All keys are optional; other keys are ignored. The body is not read until
 * the caller is authenticated and mapped to a user.
 *
 * Expected Output (Success):
 * ```json
 * { "message": "Profile updated successfully", "user": { "id": "...", ... } }
 * ```
 */
pub async fn patch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<Value>, ApiError> {
    // 1. Session verification
    tracing::info!("[PATCH /api/profile] Verifying SIWE session");
    let Some(siwe) = state.sessions.verify(&headers).await else {
        tracing::warn!("[PATCH /api/profile] No SIWE data in session");
        return Err(ApiError::unauthorized(MISSING_SESSION));
    };
    tracing::info!("[PATCH /api/profile] Authenticated via SIWE for address: {}", siwe.address);

    // 2. Identity resolution (user-tier credentials)
    let user_id = resolve_user_id(&state, &siwe.address).await?;
    tracing::info!("[PATCH /api/profile] Found user ID: {}", user_id);

    // 3. Body parsing
    let bytes = to_bytes(body, state.body_limit)
        .await
        .map_err(|e| ApiError::unexpected(format!("Failed to read request body: {}", e)))?;
    let body: Value = serde_json::from_slice(&bytes)?;
    let changes = match &body {
        Value::Object(map) => ProfileChanges::from_body(map),
        Value::Null => return Err(ApiError::unexpected("request body is JSON null")),
        _ => ProfileChanges::default(),
    };

    // 4. Field filtering
    if changes.is_empty() {
        tracing::warn!("[PATCH /api/profile] No allow-listed fields in body for user ID: {}", user_id);
        return Err(ApiError::bad_request(NO_VALID_FIELDS));
    }

    // 5. Timestamp stamping
    let update = changes.stamped(Utc::now());

    // 6. Persistence (service-tier credentials)
    tracing::info!(
        "[PATCH /api/profile] Updating profile for user ID: {} (columns: {})",
        user_id,
        update.columns().join(", ")
    );
    let user = match state.profiles.update_user(user_id, &update).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::error!("[PATCH /api/profile] Update matched no row for user ID: {}", user_id);
            return Err(ApiError::dependency_failure(
                UPDATE_FAILED,
                format!("No user row updated for id {}", user_id),
            ));
        }
        Err(e) => {
            tracing::error!("[PATCH /api/profile] Error updating profile: {}", e);
            return Err(ApiError::dependency_failure(UPDATE_FAILED, e.to_string()));
        }
    };

    // 7. Success
    tracing::info!("[PATCH /api/profile] Profile updated successfully for user ID: {}", user_id);
    Ok(Json(json!({
        "message": UPDATE_SUCCEEDED,
        "user": user
    })))
}

async fn resolve_user_id(state: &AppState, address: &str) -> Result<Uuid, ApiError> {
    match state.users.find_user_by_address(address).await {
        Ok(Some(id)) => Ok(id),
        Ok(None) => {
            tracing::error!("[PATCH /api/profile] Could not find user ID for address: {}", address);
            Err(ApiError::unauthorized(USER_MAPPING_FAILED))
        }
        Err(e) => {
            tracing::error!("[PATCH /api/profile] User lookup failed for address {}: {}", address, e);
            Err(ApiError::unauthorized(USER_MAPPING_FAILED))
        }
    }
}
