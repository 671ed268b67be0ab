// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Who may provision companies.
//!
//! The profile rule treats an `Administrator` with no company as a
//! super-administrator. A deployment can additionally require a custom claim
//! on the caller's token; that closes the gap where another flow creates an
//! unscoped administrator profile.

use crate::middleware::Caller;
use crate::user::UserProfile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperAdminPolicy {
	/// Claim that must be `true` on the caller's token, in addition to the profile rule.
	pub require_claim: Option<String>,
}

impl SuperAdminPolicy {
	/// Profile rule only.
	pub fn profile_only() -> Self {
		Self::default()
	}

	pub fn with_required_claim(claim: impl Into<String>) -> Self {
		Self {
			require_claim: Some(claim.into()),
		}
	}

	/// Decide whether `caller`, whose stored profile is `profile`, is a super-administrator.
	pub fn permits(&self, caller: &Caller, profile: Option<&UserProfile>) -> bool {
		let Some(profile) = profile else {
			return false;
		};
		if !profile.is_super_admin() {
			return false;
		}
		match &self.require_claim {
			Some(claim) => caller.has_true_claim(claim),
			None => true,
		}
	}
}
