// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller identity attached to a request.
//!
//! The HTTP layer verifies the bearer id token with the identity service and
//! attaches the result as an [`AuthContext`]. Handlers never see the token
//! itself, only the verified [`Caller`].
//!
//! ```text
//! Request → Authorization: Bearer <id token> → verify → AuthContext::authenticated
//!         → (no header)                              → AuthContext::unauthenticated
//! ```

use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Uid;

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caller {
	pub uid: Uid,
	pub email: Option<String>,
	/// Custom claims carried by the caller's token.
	#[serde(default)]
	pub claims: Map<String, Value>,
}

impl Caller {
	pub fn new(uid: Uid) -> Self {
		Self {
			uid,
			email: None,
			claims: Map::new(),
		}
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	pub fn with_claim(mut self, name: impl Into<String>, value: Value) -> Self {
		self.claims.insert(name.into(), value);
		self
	}

	/// True when the claim is present and exactly `true`.
	pub fn has_true_claim(&self, name: &str) -> bool {
		matches!(self.claims.get(name), Some(Value::Bool(true)))
	}
}

/// Authentication context for request processing.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	caller: Option<Caller>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self { caller: None }
	}

	pub fn authenticated(caller: Caller) -> Self {
		Self {
			caller: Some(caller),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.caller.is_some()
	}

	pub fn caller(&self) -> Option<&Caller> {
		self.caller.as_ref()
	}

	/// Require authentication, returning the caller or an error.
	pub fn require_caller(&self) -> Result<&Caller, AuthRequired> {
		self.caller.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Extract a bearer token from the `Authorization` header.
///
/// Returns `None` when the header is missing, not valid UTF-8, uses another
/// scheme, or carries an empty token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let (scheme, token) = value.split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}
	let token = token.trim();
	if token.is_empty() {
		None
	} else {
		Some(token)
	}
}
