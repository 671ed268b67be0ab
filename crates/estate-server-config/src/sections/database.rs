// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record store configuration.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const DEFAULT_URL: &str = "sqlite:./estate.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
	#[default]
	Sqlite,
	/// Process memory; contents are lost on restart.
	Memory,
}

impl FromStr for DatabaseBackend {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"sqlite" => Ok(DatabaseBackend::Sqlite),
			"memory" => Ok(DatabaseBackend::Memory),
			other => Err(format!("unknown database backend '{other}' (expected sqlite or memory)")),
		}
	}
}

impl fmt::Display for DatabaseBackend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DatabaseBackend::Sqlite => write!(f, "sqlite"),
			DatabaseBackend::Memory => write!(f, "memory"),
		}
	}
}

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub backend: DatabaseBackend,
	pub url: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			backend: DatabaseBackend::Sqlite,
			url: DEFAULT_URL.to_string(),
		}
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub backend: Option<DatabaseBackend>,
	#[serde(default)]
	pub url: Option<String>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			backend: self.backend.unwrap_or_default(),
			url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_url() {
		let config = DatabaseConfigLayer::default().finalize();
		assert_eq!(config.url, "sqlite:./estate.db");
		assert_eq!(config.backend, DatabaseBackend::Sqlite);
	}

	#[test]
	fn test_custom_url() {
		let layer = DatabaseConfigLayer {
			backend: None,
			url: Some("sqlite:/var/lib/estate/data.db".to_string()),
		};
		assert_eq!(layer.finalize().url, "sqlite:/var/lib/estate/data.db");
	}

	#[test]
	fn test_backend_parsing() {
		assert_eq!("SQLite".parse::<DatabaseBackend>(), Ok(DatabaseBackend::Sqlite));
		assert_eq!("memory".parse::<DatabaseBackend>(), Ok(DatabaseBackend::Memory));
		assert!("postgres".parse::<DatabaseBackend>().is_err());
	}

	#[test]
	fn test_deserialize_backend() {
		let layer: DatabaseConfigLayer = toml::from_str(r#"backend = "memory""#).unwrap();
		assert_eq!(layer.backend, Some(DatabaseBackend::Memory));
	}
}
