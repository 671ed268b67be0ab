// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::secret::load_secret_env;
use crate::sections::{
	AuthConfigLayer, DatabaseBackend, DatabaseConfigLayer, HttpConfigLayer, IdentityBackend,
	IdentityConfigLayer, LogFormat, LoggingConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/estate/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: ESTATE_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			database: Some(load_database_from_env()?),
			identity: Some(load_identity_from_env()?),
			auth: Some(load_auth_from_env()),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u16 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u32 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_parsed<T>(name: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr<Err = String>,
{
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|message| ConfigError::InvalidValue {
			key: name.to_string(),
			message,
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("ESTATE_SERVER_HOST"),
		port: env_u16("ESTATE_SERVER_PORT")?,
	})
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		backend: env_parsed::<DatabaseBackend>("ESTATE_SERVER_DATABASE_BACKEND")?,
		url: env_var("ESTATE_SERVER_DATABASE_URL"),
	})
}

fn load_identity_from_env() -> Result<IdentityConfigLayer, ConfigError> {
	Ok(IdentityConfigLayer {
		backend: env_parsed::<IdentityBackend>("ESTATE_SERVER_IDENTITY_BACKEND")?,
		base_url: env_var("ESTATE_SERVER_IDENTITY_BASE_URL"),
		project_id: env_var("ESTATE_SERVER_IDENTITY_PROJECT_ID"),
		access_token: load_secret_env("ESTATE_SERVER_IDENTITY_ACCESS_TOKEN")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
		timeout_secs: env_u64("ESTATE_SERVER_IDENTITY_TIMEOUT_SECS")?,
		max_retries: env_u32("ESTATE_SERVER_IDENTITY_MAX_RETRIES")?,
		action_url: env_var("ESTATE_SERVER_IDENTITY_ACTION_URL"),
	})
}

fn load_auth_from_env() -> AuthConfigLayer {
	AuthConfigLayer {
		super_admin_claim: env_var("ESTATE_SERVER_SUPER_ADMIN_CLAIM"),
		environment: env_var("ESTATE_SERVER_ENV"),
	}
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("ESTATE_SERVER_LOG_LEVEL"),
		format: env_parsed::<LogFormat>("ESTATE_SERVER_LOG_FORMAT")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}

	#[test]
	fn test_env_var_treats_empty_as_unset() {
		std::env::set_var("ESTATE_TEST_SOURCES_EMPTY", "");
		assert_eq!(env_var("ESTATE_TEST_SOURCES_EMPTY"), None);
		std::env::remove_var("ESTATE_TEST_SOURCES_EMPTY");
	}

	#[test]
	fn test_env_u16_rejects_garbage() {
		std::env::set_var("ESTATE_TEST_SOURCES_PORT", "eighty");
		let err = env_u16("ESTATE_TEST_SOURCES_PORT").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "ESTATE_TEST_SOURCES_PORT"));
		std::env::remove_var("ESTATE_TEST_SOURCES_PORT");
	}

	#[test]
	fn test_env_parsed_rejects_unknown_backend() {
		std::env::set_var("ESTATE_TEST_SOURCES_BACKEND", "postgres");
		let err = env_parsed::<DatabaseBackend>("ESTATE_TEST_SOURCES_BACKEND").unwrap_err();
		assert!(err.to_string().contains("unknown database backend"));
		std::env::remove_var("ESTATE_TEST_SOURCES_BACKEND");
	}

	#[test]
	fn test_env_parsed_accepts_known_format() {
		std::env::set_var("ESTATE_TEST_SOURCES_FORMAT", "JSON");
		assert_eq!(
			env_parsed::<LogFormat>("ESTATE_TEST_SOURCES_FORMAT").unwrap(),
			Some(LogFormat::Json)
		);
		std::env::remove_var("ESTATE_TEST_SOURCES_FORMAT");
	}

	#[test]
	fn test_missing_toml_file_is_empty_layer() {
		let source = TomlSource::new("/nonexistent/estate/server.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.identity.is_none());
	}

	#[test]
	fn test_toml_source_reads_sections() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[http]
host = "127.0.0.1"
port = 9000

[identity]
backend = "memory"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let http = layer.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(http.port, Some(9000));
		assert_eq!(layer.identity.unwrap().backend, Some(IdentityBackend::Memory));
	}

	#[test]
	fn test_malformed_toml_is_parse_error() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "[http\nport = ").unwrap();
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}
}
