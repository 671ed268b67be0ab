// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Estate server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`ESTATE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use estate_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod secret;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use secret::{load_secret_env, SecretEnvError};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub identity: IdentityConfig,
	pub auth: AuthConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ESTATE_SERVER_*`)
/// 2. Config file (`/etc/estate/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge `sources` in precedence order and finalize the result.
pub fn load_config_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let identity = layer.identity.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&identity, &auth)?;

	info!(
		host = %http.host,
		port = http.port,
		database_backend = %database.backend,
		identity_backend = %identity.backend,
		super_admin_claim = ?auth.super_admin_claim,
		environment = %auth.environment,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		identity,
		auth,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(identity: &IdentityConfig, auth: &AuthConfig) -> Result<(), ConfigError> {
	match identity.backend {
		IdentityBackend::Rest => {
			if identity.project_id.is_none() {
				return Err(ConfigError::Validation(
					"identity.backend = rest requires ESTATE_SERVER_IDENTITY_PROJECT_ID \
					 (or identity.project_id in the config file)"
						.to_string(),
				));
			}
			if identity.access_token.is_none() {
				return Err(ConfigError::Validation(
					"identity.backend = rest requires ESTATE_SERVER_IDENTITY_ACCESS_TOKEN \
					 (or ESTATE_SERVER_IDENTITY_ACCESS_TOKEN_FILE)"
						.to_string(),
				));
			}
		}
		IdentityBackend::Memory if auth.is_production() => {
			return Err(ConfigError::Validation(
				"ESTATE_SERVER_IDENTITY_BACKEND=memory is set while ESTATE_SERVER_ENV=production. \
				 In-memory accounts are lost on restart. Configure the rest backend or set \
				 ESTATE_SERVER_ENV to a non-production value."
					.to_string(),
			));
		}
		IdentityBackend::Memory => {}
	}

	Ok(())
}
