// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profile records.
//!
//! A [`UserProfile`] lives under `users/{uid}` in the record store, keyed by
//! the identity service's uid for the same person.
//!
//! # PII Handling
//!
//! `username` and `email` are PII. Log the uid, not the profile.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{CompanyId, Role};

/// A user's profile record.
///
/// Profiles written by other flows (for example a hand-created
/// super-administrator) may be sparse or loosely typed, so every field decodes
/// leniently:
///
/// - a missing or non-string role reads as a non-administrator
/// - any non-null `companyId` scopes the profile to a company
/// - other fields of the wrong type fall back to their defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	#[serde(default, deserialize_with = "or_default")]
	pub username: String,

	#[serde(default, deserialize_with = "or_default")]
	pub email: String,

	#[serde(default, deserialize_with = "lenient_role")]
	pub role: Role,

	/// Company this profile belongs to. `None` together with
	/// [`Role::Administrator`] marks a super-administrator.
	#[serde(
		default,
		deserialize_with = "lenient_company_id",
		skip_serializing_if = "Option::is_none"
	)]
	pub company_id: Option<CompanyId>,

	#[serde(default, deserialize_with = "or_default")]
	pub is_active: bool,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned + Default,
{
	let value = Value::deserialize(deserializer)?;
	Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::String(name) => Role::from(name),
		Value::Null => Role::default(),
		other => Role::Other(other.to_string()),
	})
}

fn lenient_company_id<'de, D>(deserializer: D) -> Result<Option<CompanyId>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => None,
		Value::String(id) => Some(CompanyId::from(id)),
		other => Some(CompanyId::from(other.to_string())),
	})
}

impl UserProfile {
	/// Profile for the owner of a freshly provisioned company.
	///
	/// The username is the local part of `email`.
	pub fn company_owner(email: &str, company_id: CompanyId) -> Self {
		Self {
			username: username_from_email(email).to_string(),
			email: email.to_string(),
			role: Role::Administrator,
			company_id: Some(company_id),
			is_active: true,
		}
	}

	/// Administrator not scoped to any company.
	pub fn is_super_admin(&self) -> bool {
		self.role.is_administrator() && self.company_id.is_none()
	}

	/// Administrator of a specific company.
	pub fn is_company_admin(&self) -> bool {
		self.role.is_administrator() && self.company_id.is_some()
	}
}

/// Everything before the first `@`, or the whole string when there is none.
pub fn username_from_email(email: &str) -> &str {
	email.split('@').next().unwrap_or(email)
}
