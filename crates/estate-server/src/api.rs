// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{
	middleware::from_fn_with_state,
	routing::{get, post},
	Json, Router,
};
use estate_server_auth::SuperAdminPolicy;
use estate_server_config::{DatabaseBackend, IdentityBackend, IdentityConfig, ServerConfig};
use estate_server_db::{
	create_pool, run_migrations, DirectoryRepository, InMemoryRecordStore, RecordStore,
	SqliteRecordStore,
};
use estate_server_identity::{
	IdentityProvider, IdentityToolkitClient, IdentityToolkitConfig, InMemoryIdentityProvider,
};
use estate_server_provisioning::CompanyProvisioningService;
use utoipa::OpenApi;

use crate::api_docs::ApiDoc;
use crate::auth_middleware::auth_layer;
use crate::error::ServerError;
use crate::routes;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
	pub provisioning: Arc<CompanyProvisioningService>,
	pub identity: Arc<dyn IdentityProvider>,
	pub store: Arc<dyn RecordStore>,
}

impl AppState {
	pub fn new(
		identity: Arc<dyn IdentityProvider>,
		store: Arc<dyn RecordStore>,
		policy: SuperAdminPolicy,
	) -> Self {
		let directory = DirectoryRepository::new(Arc::clone(&store));
		let provisioning = Arc::new(CompanyProvisioningService::new(
			Arc::clone(&identity),
			directory,
			policy,
		));
		Self {
			provisioning,
			identity,
			store,
		}
	}
}

/// Build the collaborators named by `config` and wrap them in an [`AppState`].
#[tracing::instrument(skip_all)]
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let store = create_store(config).await?;
	let identity = create_identity_provider(config)?;
	let policy = match &config.auth.super_admin_claim {
		Some(claim) => SuperAdminPolicy::with_required_claim(claim.clone()),
		None => SuperAdminPolicy::profile_only(),
	};
	Ok(AppState::new(identity, store, policy))
}

async fn create_store(config: &ServerConfig) -> Result<Arc<dyn RecordStore>, ServerError> {
	match config.database.backend {
		DatabaseBackend::Sqlite => {
			let pool = create_pool(&config.database.url).await?;
			run_migrations(&pool).await?;
			tracing::info!(url = %config.database.url, "using SQLite record store");
			Ok(Arc::new(SqliteRecordStore::new(pool)))
		}
		DatabaseBackend::Memory => {
			tracing::warn!("using in-memory record store; records are lost on restart");
			Ok(Arc::new(InMemoryRecordStore::new()))
		}
	}
}

/// REST client settings. `max_retries` counts retries, so the client makes
/// one more attempt than that in total.
fn identity_toolkit_config(identity: &IdentityConfig) -> Result<IdentityToolkitConfig, ServerError> {
	let project_id = identity
		.project_id
		.clone()
		.ok_or(ServerError::MissingSetting("identity.project_id"))?;
	let access_token = identity
		.access_token
		.clone()
		.ok_or(ServerError::MissingSetting("identity.access_token"))?;

	let mut client_config = IdentityToolkitConfig::new(project_id, access_token);
	client_config.base_url = identity.base_url.clone();
	client_config.timeout = Duration::from_secs(identity.timeout_secs);
	client_config.retry.max_attempts = identity.max_retries.saturating_add(1);
	Ok(client_config)
}

fn create_identity_provider(
	config: &ServerConfig,
) -> Result<Arc<dyn IdentityProvider>, ServerError> {
	let identity = &config.identity;
	match identity.backend {
		IdentityBackend::Rest => {
			let client_config = identity_toolkit_config(identity)?;

			tracing::info!(
				base_url = %client_config.base_url,
				project_id = %client_config.project_id,
				"using Identity Toolkit identity provider"
			);
			Ok(Arc::new(IdentityToolkitClient::new(client_config)?))
		}
		IdentityBackend::Memory => {
			tracing::warn!("using in-memory identity provider; accounts are lost on restart");
			Ok(Arc::new(InMemoryIdentityProvider::new(
				identity.action_url.clone(),
			)))
		}
	}
}

/// Build the HTTP router.
///
/// `/provisionCompany` runs behind [`auth_layer`]; health and the OpenAPI
/// document are public.
pub fn create_router(state: AppState) -> Router {
	let callable = Router::new()
		.route(
			"/provisionCompany",
			post(routes::provision::provision_company),
		)
		.route_layer(from_fn_with_state(state.clone(), auth_layer));

	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

	callable.merge(public).with_state(state)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{body::Body, http::Request, http::StatusCode};
	use estate_server_config::DatabaseConfig;
	use tower::ServiceExt;

	fn memory_config() -> ServerConfig {
		ServerConfig {
			database: DatabaseConfig {
				backend: DatabaseBackend::Memory,
				..Default::default()
			},
			identity: IdentityConfig {
				backend: IdentityBackend::Memory,
				..Default::default()
			},
			..Default::default()
		}
	}

	#[tokio::test]
	async fn creates_state_from_memory_config() {
		let state = create_app_state(&memory_config()).await.unwrap();
		assert!(state.store.ping().await.is_ok());
	}

	#[tokio::test]
	async fn creates_state_with_sqlite_store() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = memory_config();
		config.database.backend = DatabaseBackend::Sqlite;
		config.database.url = format!("sqlite:{}", dir.path().join("estate.db").display());

		let state = create_app_state(&config).await.unwrap();
		assert!(state.store.ping().await.is_ok());
	}

	#[test]
	fn configured_retries_follow_the_first_attempt() {
		let mut identity = IdentityConfig {
			project_id: Some("estate-prod".to_string()),
			access_token: Some(estate_common_secret::SecretString::new("token".to_string())),
			..Default::default()
		};

		let client_config = identity_toolkit_config(&identity).unwrap();
		assert_eq!(client_config.retry.max_attempts, 4);

		identity.max_retries = 0;
		let client_config = identity_toolkit_config(&identity).unwrap();
		assert_eq!(client_config.retry.max_attempts, 1);
	}

	#[tokio::test]
	async fn rest_identity_without_project_is_rejected() {
		let mut config = memory_config();
		config.identity.backend = IdentityBackend::Rest;
		let result = create_app_state(&config).await;
		assert!(matches!(
			result,
			Err(ServerError::MissingSetting("identity.project_id"))
		));
	}

	#[tokio::test]
	async fn serves_openapi_document() {
		let state = create_app_state(&memory_config()).await.unwrap();
		let response = create_router(state)
			.oneshot(
				Request::builder()
					.uri("/api/openapi.json")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
		assert!(doc["paths"]["/provisionCompany"]["post"].is_object());
		assert!(doc["paths"]["/health"]["get"].is_object());
	}
}
