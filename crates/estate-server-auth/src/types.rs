// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for tenants and profiles.
//!
//! - **Key newtypes**: type-safe wrappers around the string keys handed out by
//!   the identity service ([`Uid`]) and the record store ([`CompanyId`])
//! - **Roles**: the profile [`Role`]
//!
//! Keys serialize transparently as strings so they can be embedded in stored
//! records and record paths.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Key Newtypes
// =============================================================================

macro_rules! define_key_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Create a key from its string form.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			/// Borrow the key as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}

			/// Get the inner string value.
			pub fn into_inner(self) -> String {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_string())
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

define_key_type!(
	Uid,
	"Identifier the identity service assigns to an account. Also keys the account's profile."
);
define_key_type!(CompanyId, "Key of a company record, allocated by the record store.");

// =============================================================================
// Roles
// =============================================================================

/// Role stored on a user profile.
///
/// Only `Administrator` carries meaning for provisioning; any other stored
/// value round-trips unchanged through [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
	/// Company administrator, or super-administrator when the profile has no company.
	Administrator,
	/// Any other role name.
	Other(String),
}

impl Role {
	pub const ADMINISTRATOR: &'static str = "Administrator";

	/// Returns true for the `Administrator` role. Matching is case-sensitive.
	pub fn is_administrator(&self) -> bool {
		matches!(self, Role::Administrator)
	}

	pub fn as_str(&self) -> &str {
		match self {
			Role::Administrator => Self::ADMINISTRATOR,
			Role::Other(name) => name,
		}
	}
}

impl Default for Role {
	fn default() -> Self {
		Role::Other(String::new())
	}
}

impl From<String> for Role {
	fn from(value: String) -> Self {
		if value == Self::ADMINISTRATOR {
			Role::Administrator
		} else {
			Role::Other(value)
		}
	}
}

impl From<Role> for String {
	fn from(role: Role) -> Self {
		match role {
			Role::Administrator => Role::ADMINISTRATOR.to_string(),
			Role::Other(name) => name,
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn role_string_roundtrips(name in "[A-Za-z ]{0,20}") {
			let role = Role::from(name.clone());
			prop_assert_eq!(String::from(role), name);
		}
	}
}
