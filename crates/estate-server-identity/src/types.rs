// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use estate_common_secret::SecretString;
use estate_server_auth::{Caller, Uid};
use serde_json::{Map, Value};

/// Request to create an account.
#[derive(Debug, Clone)]
pub struct NewIdentity {
	pub email: String,
	pub password: SecretString,
	pub email_verified: bool,
}

impl NewIdentity {
	/// An unverified account with the given credential.
	pub fn unverified(email: impl Into<String>, password: SecretString) -> Self {
		Self {
			email: email.into(),
			password,
			email_verified: false,
		}
	}
}

/// An account as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
	pub uid: Uid,
	pub email: String,
	pub email_verified: bool,
	pub disabled: bool,
}

/// Result of verifying an id token.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
	pub uid: Uid,
	pub email: Option<String>,
	pub claims: Map<String, Value>,
}

impl From<VerifiedToken> for Caller {
	fn from(token: VerifiedToken) -> Self {
		Caller {
			uid: token.uid,
			email: token.email,
			claims: token.claims,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn new_identity_debug_hides_password() {
		let identity = NewIdentity::unverified("a@b.c", SecretString::new("hunter22".to_string()));
		let debug = format!("{identity:?}");
		assert!(!debug.contains("hunter22"));
		assert!(!identity.email_verified);
	}

	#[test]
	fn verified_token_becomes_caller() {
		let mut claims = Map::new();
		claims.insert("superAdmin".to_string(), json!(true));
		let caller: Caller = VerifiedToken {
			uid: Uid::from("u1"),
			email: Some("a@b.c".to_string()),
			claims,
		}
		.into();
		assert_eq!(caller.uid, Uid::from("u1"));
		assert!(caller.has_true_claim("superAdmin"));
	}
}
