// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers shared with downstream crates.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::IdentityError;
use crate::provider::IdentityProvider;
use crate::types::{IdentityRecord, NewIdentity, VerifiedToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
	CreateUser(String),
	ResetLink(String),
	VerifyToken,
}

/// Wraps a provider and records every call, with the email involved.
pub struct RecordingIdentityProvider {
	inner: Arc<dyn IdentityProvider>,
	calls: Mutex<Vec<IdentityCall>>,
}

impl RecordingIdentityProvider {
	pub fn new(inner: Arc<dyn IdentityProvider>) -> Self {
		Self {
			inner,
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn calls(&self) -> Vec<IdentityCall> {
		self.calls.lock().unwrap().clone()
	}

	/// Calls other than token verification.
	pub fn mutating_calls(&self) -> Vec<IdentityCall> {
		self.calls()
			.into_iter()
			.filter(|call| *call != IdentityCall::VerifyToken)
			.collect()
	}

	fn record(&self, call: IdentityCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
	async fn create_user(&self, identity: NewIdentity) -> Result<IdentityRecord, IdentityError> {
		self.record(IdentityCall::CreateUser(identity.email.clone()));
		self.inner.create_user(identity).await
	}

	async fn generate_password_reset_link(&self, email: &str) -> Result<String, IdentityError> {
		self.record(IdentityCall::ResetLink(email.to_string()));
		self.inner.generate_password_reset_link(email).await
	}

	async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
		self.record(IdentityCall::VerifyToken);
		self.inner.verify_id_token(id_token).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::InMemoryIdentityProvider;
	use estate_common_secret::SecretString;

	#[tokio::test]
	async fn records_calls() {
		let recording =
			RecordingIdentityProvider::new(Arc::new(InMemoryIdentityProvider::new("https://x")));
		recording
			.create_user(NewIdentity::unverified(
				"a@b.c",
				SecretString::new("abcdefghA1!".to_string()),
			))
			.await
			.unwrap();
		recording.generate_password_reset_link("a@b.c").await.unwrap();
		let _ = recording.verify_id_token("nope").await;

		assert_eq!(
			recording.calls(),
			vec![
				IdentityCall::CreateUser("a@b.c".to_string()),
				IdentityCall::ResetLink("a@b.c".to_string()),
				IdentityCall::VerifyToken,
			]
		);
		assert_eq!(recording.mutating_calls().len(), 2);
	}
}
