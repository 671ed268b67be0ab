// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::IdentityError;
use crate::types::{IdentityRecord, NewIdentity, VerifiedToken};

/// Operations the server needs from the identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Create an account. Fails with [`IdentityError::EmailExists`] when the
	/// email is already registered.
	async fn create_user(&self, identity: NewIdentity) -> Result<IdentityRecord, IdentityError>;

	/// A one-time link that lets the account holder choose a new password.
	async fn generate_password_reset_link(&self, email: &str) -> Result<String, IdentityError>;

	/// Verify an id token presented by a caller.
	async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError>;
}
