// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt::Display;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields (companyName, ownerEmail, tier).";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred.";

/// Errors reported to the caller of company provisioning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisioningError {
	#[error("You must be logged in to create a company.")]
	Unauthenticated,

	#[error("Only Super Administrators can provision companies.")]
	PermissionDenied,

	#[error("{0}")]
	InvalidArgument(String),

	#[error("{0}")]
	Internal(String),
}

impl ProvisioningError {
	pub fn missing_fields() -> Self {
		ProvisioningError::InvalidArgument(MISSING_FIELDS_MESSAGE.to_string())
	}

	/// Wrap a collaborator failure, keeping its message.
	pub fn internal(err: impl Display) -> Self {
		let message = err.to_string();
		if message.trim().is_empty() {
			ProvisioningError::Internal(UNKNOWN_ERROR_MESSAGE.to_string())
		} else {
			ProvisioningError::Internal(message)
		}
	}

	/// Short error code, e.g. `permission-denied`.
	pub fn code(&self) -> &'static str {
		match self {
			ProvisioningError::Unauthenticated => "unauthenticated",
			ProvisioningError::PermissionDenied => "permission-denied",
			ProvisioningError::InvalidArgument(_) => "invalid-argument",
			ProvisioningError::Internal(_) => "internal",
		}
	}

	/// Callable protocol status name, e.g. `PERMISSION_DENIED`.
	pub fn status(&self) -> &'static str {
		match self {
			ProvisioningError::Unauthenticated => "UNAUTHENTICATED",
			ProvisioningError::PermissionDenied => "PERMISSION_DENIED",
			ProvisioningError::InvalidArgument(_) => "INVALID_ARGUMENT",
			ProvisioningError::Internal(_) => "INTERNAL",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		assert_eq!(
			ProvisioningError::Unauthenticated.to_string(),
			"You must be logged in to create a company."
		);
		assert_eq!(
			ProvisioningError::PermissionDenied.to_string(),
			"Only Super Administrators can provision companies."
		);
		assert_eq!(
			ProvisioningError::missing_fields().to_string(),
			"Missing required fields (companyName, ownerEmail, tier)."
		);
	}

	#[test]
	fn codes_and_statuses() {
		let cases = [
			(ProvisioningError::Unauthenticated, "unauthenticated", "UNAUTHENTICATED"),
			(ProvisioningError::PermissionDenied, "permission-denied", "PERMISSION_DENIED"),
			(ProvisioningError::missing_fields(), "invalid-argument", "INVALID_ARGUMENT"),
			(ProvisioningError::internal("boom"), "internal", "INTERNAL"),
		];
		for (err, code, status) in cases {
			assert_eq!(err.code(), code);
			assert_eq!(err.status(), status);
		}
	}

	#[test]
	fn internal_keeps_message() {
		assert_eq!(
			ProvisioningError::internal("The email address is already in use by another account."),
			ProvisioningError::Internal(
				"The email address is already in use by another account.".to_string()
			)
		);
	}

	#[test]
	fn internal_with_empty_message_is_unknown() {
		assert_eq!(
			ProvisioningError::internal(""),
			ProvisioningError::Internal("Unknown error occurred.".to_string())
		);
		assert_eq!(
			ProvisioningError::internal("   "),
			ProvisioningError::Internal("Unknown error occurred.".to_string())
		);
	}
}
