// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process identity service for tests and local development.
//!
//! Behaves like the hosted service where provisioning can observe it: emails
//! are unique ignoring case, weak passwords are rejected, and reset links
//! carry a one-time code. Id tokens are opaque random strings handed out by
//! [`InMemoryIdentityProvider::issue_id_token`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use estate_common_secret::SecretString;
use estate_server_auth::Uid;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};

use crate::error::IdentityError;
use crate::password::validate_password_strength;
use crate::provider::IdentityProvider;
use crate::types::{IdentityRecord, NewIdentity, VerifiedToken};

const UID_LEN: usize = 28;
const TOKEN_LEN: usize = 40;
const OOB_CODE_LEN: usize = 32;

fn random_string(len: usize) -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(len)
		.map(char::from)
		.collect()
}

struct Account {
	record: IdentityRecord,
	password: SecretString,
	claims: Map<String, Value>,
}

#[derive(Default)]
struct State {
	accounts: HashMap<Uid, Account>,
	uid_by_email: HashMap<String, Uid>,
	tokens: HashMap<String, Uid>,
	reset_codes: HashMap<String, Uid>,
	fail_reset_links: bool,
}

pub struct InMemoryIdentityProvider {
	action_url: String,
	state: Mutex<State>,
}

impl InMemoryIdentityProvider {
	/// `action_url` is the page reset links point at.
	pub fn new(action_url: impl Into<String>) -> Self {
		Self {
			action_url: action_url.into(),
			state: Mutex::new(State::default()),
		}
	}

	/// Make every reset link request fail, for exercising partial failures.
	pub fn with_failing_reset_links(self) -> Self {
		if let Ok(mut state) = self.state.lock() {
			state.fail_reset_links = true;
		}
		self
	}

	fn lock(&self) -> Result<MutexGuard<'_, State>, IdentityError> {
		self.state
			.lock()
			.map_err(|_| IdentityError::Internal("identity state lock poisoned".to_string()))
	}

	/// Issue an id token for an existing account, carrying `claims` as custom claims.
	pub fn issue_id_token(&self, uid: &Uid, claims: Map<String, Value>) -> Result<String, IdentityError> {
		let mut state = self.lock()?;
		let account = state
			.accounts
			.get_mut(uid)
			.ok_or(IdentityError::UserNotFound)?;
		account.claims = claims;
		let token = random_string(TOKEN_LEN);
		state.tokens.insert(token.clone(), uid.clone());
		Ok(token)
	}

	/// Register an account under a fixed uid, for seeding existing users.
	pub fn insert_account(
		&self,
		uid: Uid,
		email: &str,
		password: SecretString,
	) -> Result<IdentityRecord, IdentityError> {
		let mut state = self.lock()?;
		Self::insert_locked(&mut state, uid, email, password, false)
	}

	pub fn account(&self, uid: &Uid) -> Option<IdentityRecord> {
		self.lock()
			.ok()?
			.accounts
			.get(uid)
			.map(|account| account.record.clone())
	}

	pub fn account_by_email(&self, email: &str) -> Option<IdentityRecord> {
		let state = self.lock().ok()?;
		let uid = state.uid_by_email.get(&email.to_lowercase())?;
		state.accounts.get(uid).map(|account| account.record.clone())
	}

	pub fn account_count(&self) -> usize {
		self.lock().map(|state| state.accounts.len()).unwrap_or(0)
	}

	pub fn check_password(&self, uid: &Uid, candidate: &str) -> bool {
		self.lock()
			.ok()
			.and_then(|state| {
				state
					.accounts
					.get(uid)
					.map(|account| account.password.expose() == candidate)
			})
			.unwrap_or(false)
	}

	/// Account a reset code was issued for.
	pub fn reset_code_owner(&self, code: &str) -> Option<Uid> {
		self.lock().ok()?.reset_codes.get(code).cloned()
	}

	fn insert_locked(
		state: &mut State,
		uid: Uid,
		email: &str,
		password: SecretString,
		email_verified: bool,
	) -> Result<IdentityRecord, IdentityError> {
		let email = email.trim();
		if !is_plausible_email(email) {
			return Err(IdentityError::InvalidEmail);
		}
		validate_password_strength(password.expose()).map_err(IdentityError::WeakPassword)?;

		let key = email.to_lowercase();
		if state.uid_by_email.contains_key(&key) || state.accounts.contains_key(&uid) {
			return Err(IdentityError::EmailExists);
		}

		let record = IdentityRecord {
			uid: uid.clone(),
			email: email.to_string(),
			email_verified,
			disabled: false,
		};
		state.uid_by_email.insert(key, uid.clone());
		state.accounts.insert(
			uid,
			Account {
				record: record.clone(),
				password,
				claims: Map::new(),
			},
		);
		Ok(record)
	}
}

fn is_plausible_email(email: &str) -> bool {
	match email.split_once('@') {
		Some((local, domain)) => {
			!local.is_empty()
				&& !domain.is_empty()
				&& !domain.contains('@')
				&& !email.chars().any(char::is_whitespace)
		}
		None => false,
	}
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
	async fn create_user(&self, identity: NewIdentity) -> Result<IdentityRecord, IdentityError> {
		let mut state = self.lock()?;
		let uid = Uid::new(random_string(UID_LEN));
		let record = Self::insert_locked(
			&mut state,
			uid,
			&identity.email,
			identity.password,
			identity.email_verified,
		)?;
		tracing::debug!(uid = %record.uid, "in-memory identity account created");
		Ok(record)
	}

	async fn generate_password_reset_link(&self, email: &str) -> Result<String, IdentityError> {
		let mut state = self.lock()?;
		if state.fail_reset_links {
			return Err(IdentityError::Api {
				status: 503,
				message: "reset links unavailable".to_string(),
			});
		}
		let uid = state
			.uid_by_email
			.get(&email.trim().to_lowercase())
			.cloned()
			.ok_or(IdentityError::UserNotFound)?;
		let code = random_string(OOB_CODE_LEN);
		state.reset_codes.insert(code.clone(), uid);

		let separator = if self.action_url.contains('?') { '&' } else { '?' };
		Ok(format!(
			"{}{separator}mode=resetPassword&oobCode={code}",
			self.action_url
		))
	}

	async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
		let state = self.lock()?;
		let uid = state.tokens.get(id_token).ok_or(IdentityError::InvalidToken)?;
		let account = state.accounts.get(uid).ok_or(IdentityError::InvalidToken)?;
		if account.record.disabled {
			return Err(IdentityError::InvalidToken);
		}
		Ok(VerifiedToken {
			uid: uid.clone(),
			email: Some(account.record.email.clone()),
			claims: account.claims.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn provider() -> InMemoryIdentityProvider {
		InMemoryIdentityProvider::new("https://estate.example/auth/action")
	}

	fn new_identity(email: &str) -> NewIdentity {
		NewIdentity::unverified(email, SecretString::new("abcdefghA1!".to_string()))
	}

	#[tokio::test]
	async fn create_user_assigns_uid() {
		let idp = provider();
		let record = idp.create_user(new_identity("owner@acme.com")).await.unwrap();

		assert_eq!(record.uid.as_str().len(), 28);
		assert_eq!(record.email, "owner@acme.com");
		assert!(!record.email_verified);
		assert!(idp.check_password(&record.uid, "abcdefghA1!"));
		assert_eq!(idp.account_count(), 1);
	}

	#[tokio::test]
	async fn duplicate_email_ignores_case() {
		let idp = provider();
		idp.create_user(new_identity("owner@acme.com")).await.unwrap();
		let err = idp
			.create_user(new_identity("Owner@ACME.com"))
			.await
			.unwrap_err();
		assert!(matches!(err, IdentityError::EmailExists));
		assert_eq!(idp.account_count(), 1);
	}

	#[tokio::test]
	async fn rejects_malformed_email_and_weak_password() {
		let idp = provider();
		assert!(matches!(
			idp.create_user(new_identity("not-an-email")).await,
			Err(IdentityError::InvalidEmail)
		));
		assert!(matches!(
			idp.create_user(NewIdentity::unverified(
				"a@b.c",
				SecretString::new("123".to_string())
			))
			.await,
			Err(IdentityError::WeakPassword(_))
		));
		assert_eq!(idp.account_count(), 0);
	}

	#[tokio::test]
	async fn reset_link_carries_one_time_code() {
		let idp = provider();
		let record = idp.create_user(new_identity("owner@acme.com")).await.unwrap();

		let link = idp
			.generate_password_reset_link("owner@acme.com")
			.await
			.unwrap();
		let prefix = "https://estate.example/auth/action?mode=resetPassword&oobCode=";
		assert!(link.starts_with(prefix), "unexpected link {link}");

		let code = &link[prefix.len()..];
		assert_eq!(idp.reset_code_owner(code), Some(record.uid));
	}

	#[tokio::test]
	async fn reset_link_for_unknown_email_fails() {
		let idp = provider();
		assert!(matches!(
			idp.generate_password_reset_link("ghost@acme.com").await,
			Err(IdentityError::UserNotFound)
		));
	}

	#[tokio::test]
	async fn failing_reset_links() {
		let idp = provider().with_failing_reset_links();
		idp.create_user(new_identity("owner@acme.com")).await.unwrap();
		assert!(idp
			.generate_password_reset_link("owner@acme.com")
			.await
			.is_err());
	}

	#[tokio::test]
	async fn issued_tokens_verify() {
		let idp = provider();
		let record = idp.create_user(new_identity("root@estate.dev")).await.unwrap();
		let mut claims = Map::new();
		claims.insert("superAdmin".to_string(), json!(true));
		let token = idp.issue_id_token(&record.uid, claims).unwrap();

		let verified = idp.verify_id_token(&token).await.unwrap();
		assert_eq!(verified.uid, record.uid);
		assert_eq!(verified.email.as_deref(), Some("root@estate.dev"));
		assert_eq!(verified.claims.get("superAdmin"), Some(&json!(true)));
	}

	#[tokio::test]
	async fn unknown_tokens_are_invalid() {
		let idp = provider();
		assert!(matches!(
			idp.verify_id_token("nope").await,
			Err(IdentityError::InvalidToken)
		));
	}

	#[test]
	fn issue_token_for_unknown_account_fails() {
		let idp = provider();
		assert!(matches!(
			idp.issue_id_token(&Uid::from("ghost"), Map::new()),
			Err(IdentityError::UserNotFound)
		));
	}

	#[test]
	fn seeded_accounts_are_visible() {
		let idp = provider();
		idp.insert_account(
			Uid::from("admin"),
			"root@estate.dev",
			SecretString::new("rootpass".to_string()),
		)
		.unwrap();
		assert_eq!(
			idp.account_by_email("ROOT@estate.dev").map(|r| r.uid),
			Some(Uid::from("admin"))
		);
	}
}
