//! HTTP endpoint for account deletion.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::DeletionError;

use super::service::DeletionService;

/// Shared state for the deletion routes.
#[derive(Clone)]
pub struct DeletionRouteState {
    pub service: Arc<DeletionService>,
}

/// Build the deletion router.
///
/// Any method on `/delete-user` runs the protocol; `OPTIONS` preflights
/// are answered unconditionally with permissive CORS headers so the app's
/// web origin can call the endpoint.
pub fn deletion_routes(state: DeletionRouteState) -> Router {
    Router::new()
        .route("/delete-user", any(delete_user))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "campuscrush-delete-user"
    }))
}

/// ANY /delete-user
///
/// Consumes only the `Authorization` header; no body fields are read.
/// Every failure is converted to a structured JSON error here — nothing
/// propagates as an unhandled fault.
async fn delete_user(
    State(state): State<DeletionRouteState>,
    method: Method,
    headers: HeaderMap,
) -> impl IntoResponse {
    // Preflight carries no body logic.
    if method == Method::OPTIONS {
        return (StatusCode::OK, Json(serde_json::json!({"status": "ok"})));
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(strip_bearer);

    match state.service.delete_account(bearer).await {
        Ok(user_id) => {
            info!(user_id = %user_id, "Deletion request completed");
            (
                StatusCode::OK,
                Json(serde_json::json!({"message": "User deleted successfully"})),
            )
        }
        Err(DeletionError::Unauthenticated) => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "User not found"})),
        ),
        Err(e @ DeletionError::Failed { .. }) => {
            error!(error = %e, "Deletion request failed");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}

/// Accept either a raw token or a full `Bearer <token>` header value.
fn strip_bearer(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed)
        .trim()
}
