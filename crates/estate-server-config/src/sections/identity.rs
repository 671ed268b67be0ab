// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity service configuration.

use estate_common_secret::SecretString;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_ACTION_URL: &str = "http://localhost:8080/auth/action";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
	/// Identity Toolkit compatible REST API.
	#[default]
	Rest,
	/// In-process accounts for development. Refused in production.
	Memory,
}

impl FromStr for IdentityBackend {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"rest" => Ok(IdentityBackend::Rest),
			"memory" => Ok(IdentityBackend::Memory),
			other => Err(format!("unknown identity backend '{other}' (expected rest or memory)")),
		}
	}
}

impl fmt::Display for IdentityBackend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			IdentityBackend::Rest => write!(f, "rest"),
			IdentityBackend::Memory => write!(f, "memory"),
		}
	}
}

/// Identity service configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct IdentityConfig {
	pub backend: IdentityBackend,
	pub base_url: String,
	pub project_id: Option<String>,
	/// Service access token. Redacted in `Debug`.
	pub access_token: Option<SecretString>,
	pub timeout_secs: u64,
	/// Retries after the first attempt for retried calls. Zero disables retrying.
	pub max_retries: u32,
	/// Page that password reset links point at (in-memory backend).
	pub action_url: String,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		IdentityConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfigLayer {
	#[serde(default)]
	pub backend: Option<IdentityBackend>,
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub project_id: Option<String>,
	#[serde(default)]
	pub access_token: Option<SecretString>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_retries: Option<u32>,
	#[serde(default)]
	pub action_url: Option<String>,
}

impl IdentityConfigLayer {
	pub fn merge(&mut self, other: IdentityConfigLayer) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.project_id.is_some() {
			self.project_id = other.project_id;
		}
		if other.access_token.is_some() {
			self.access_token = other.access_token;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.max_retries.is_some() {
			self.max_retries = other.max_retries;
		}
		if other.action_url.is_some() {
			self.action_url = other.action_url;
		}
	}

	pub fn finalize(self) -> IdentityConfig {
		IdentityConfig {
			backend: self.backend.unwrap_or_default(),
			base_url: self
				.base_url
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
			project_id: self.project_id.filter(|p| !p.trim().is_empty()),
			access_token: self.access_token.filter(|t| !t.expose().is_empty()),
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
			max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
			action_url: self
				.action_url
				.unwrap_or_else(|| DEFAULT_ACTION_URL.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = IdentityConfig::default();
		assert_eq!(config.backend, IdentityBackend::Rest);
		assert_eq!(config.base_url, "https://identitytoolkit.googleapis.com");
		assert_eq!(config.project_id, None);
		assert!(config.access_token.is_none());
		assert_eq!(config.timeout_secs, 30);
		assert_eq!(config.max_retries, 3);
	}

	#[test]
	fn test_merge_keeps_token_unless_overridden() {
		let mut base = IdentityConfigLayer {
			access_token: Some(SecretString::new("from-file".to_string())),
			project_id: Some("estate-prod".to_string()),
			..Default::default()
		};
		base.merge(IdentityConfigLayer {
			project_id: Some("estate-staging".to_string()),
			..Default::default()
		});
		let config = base.finalize();
		assert_eq!(config.project_id.as_deref(), Some("estate-staging"));
		assert_eq!(config.access_token.unwrap().expose(), "from-file");
	}

	#[test]
	fn test_zero_retries_is_kept() {
		let config = IdentityConfigLayer {
			max_retries: Some(0),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.max_retries, 0);
	}

	#[test]
	fn test_debug_redacts_access_token() {
		let config = IdentityConfigLayer {
			access_token: Some(SecretString::new("ya29.secret-token".to_string())),
			..Default::default()
		}
		.finalize();
		let debug = format!("{config:?}");
		assert!(!debug.contains("ya29.secret-token"));
	}

	#[test]
	fn test_deserialize_from_toml() {
		let layer: IdentityConfigLayer = toml::from_str(
			r#"
backend = "memory"
project_id = "estate-dev"
action_url = "http://localhost:3000/action"
"#,
		)
		.unwrap();
		assert_eq!(layer.backend, Some(IdentityBackend::Memory));
		assert_eq!(layer.project_id.as_deref(), Some("estate-dev"));
		assert_eq!(layer.action_url.as_deref(), Some("http://localhost:3000/action"));
	}
}
