// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthComponents {
	pub store: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub version: String,
	pub components: HealthComponents,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "Record store is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Liveness plus record store reachability.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let start = Instant::now();
	let store = match state.store.ping().await {
		Ok(()) => ComponentHealth {
			status: HealthStatus::Healthy,
			latency_ms: start.elapsed().as_millis() as u64,
			error: None,
		},
		Err(e) => {
			tracing::warn!(error = %e, "record store health check failed");
			ComponentHealth {
				status: HealthStatus::Unhealthy,
				latency_ms: start.elapsed().as_millis() as u64,
				error: Some(e.to_string()),
			}
		}
	};

	let status = store.status;
	let response = HealthResponse {
		status,
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		components: HealthComponents { store },
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
