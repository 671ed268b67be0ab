// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller authorization configuration.

use serde::Deserialize;

fn default_environment() -> String {
	"development".to_string()
}

/// Authorization configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Custom claim a super-administrator's token must carry as `true`.
	/// `None` keeps the profile rule only.
	pub super_admin_claim: Option<String>,
	/// Deployment environment name, e.g. `production`.
	pub environment: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			super_admin_claim: None,
			environment: default_environment(),
		}
	}
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub super_admin_claim: Option<String>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.super_admin_claim.is_some() {
			self.super_admin_claim = other.super_admin_claim;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			super_admin_claim: self
				.super_admin_claim
				.map(|claim| claim.trim().to_string())
				.filter(|claim| !claim.is_empty()),
			environment: self.environment.unwrap_or_else(default_environment),
		}
	}
}
