// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Local store availability.
    pub local_store: String,
    /// Whether a wallet session is currently connected.
    pub wallet_connected: bool,
}

/// Health check endpoint handler.
///
/// Returns 200 when the local store is readable, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Local store unavailable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = match state.journal.cache().health_check() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Local store health check failed");
            false
        }
    };

    let response = HealthResponse {
        status: if store_ok { "ok" } else { "degraded" }.to_string(),
        local_store: if store_ok { "ok" } else { "unavailable" }.to_string(),
        wallet_connected: state.journal.wallet_state().await.is_connected,
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::tests::{app, get, json_body, send};

    #[tokio::test]
    async fn health_reports_store_and_wallet() {
        let (app, _state, _dir) = app(None, "0");

        let response = send(&app, get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "ok", "local_store": "ok", "wallet_connected": false })
        );
    }
}
