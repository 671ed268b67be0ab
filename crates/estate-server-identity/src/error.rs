// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use estate_common_http::RetryableError;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
	#[error("The email address is already in use by another account.")]
	EmailExists,

	#[error("The email address is improperly formatted.")]
	InvalidEmail,

	#[error("The password is too weak: {0}")]
	WeakPassword(String),

	#[error("There is no user record corresponding to the provided identifier.")]
	UserNotFound,

	#[error("The id token is invalid or has expired.")]
	InvalidToken,

	#[error("identity service request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("identity service error ({status}): {message}")]
	Api { status: u16, message: String },

	#[error("failed to parse identity service response: {0}")]
	Parse(String),

	#[error("invalid identity configuration: {0}")]
	Config(String),

	#[error("{0}")]
	Internal(String),
}

impl IdentityError {
	/// Map an error response body from the identity service.
	///
	/// The service reports errors as `{"error": {"message": "CODE : detail"}}`.
	pub fn from_api_response(status: u16, body: &str) -> Self {
		#[derive(serde::Deserialize)]
		struct Envelope {
			error: Body,
		}
		#[derive(serde::Deserialize)]
		struct Body {
			message: String,
		}

		let Ok(envelope) = serde_json::from_str::<Envelope>(body) else {
			return IdentityError::Api {
				status,
				message: body.trim().to_string(),
			};
		};
		let message = envelope.error.message;
		let (code, detail) = match message.split_once(':') {
			Some((code, detail)) => (code.trim(), detail.trim()),
			None => (message.trim(), ""),
		};
		match code {
			"EMAIL_EXISTS" | "DUPLICATE_EMAIL" => IdentityError::EmailExists,
			"INVALID_EMAIL" => IdentityError::InvalidEmail,
			"WEAK_PASSWORD" => IdentityError::WeakPassword(detail.to_string()),
			"EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityError::UserNotFound,
			"INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_DISABLED" => IdentityError::InvalidToken,
			_ => IdentityError::Api { status, message },
		}
	}
}

impl RetryableError for IdentityError {
	fn is_retryable(&self) -> bool {
		match self {
			IdentityError::Http(e) => e.is_retryable(),
			IdentityError::Api { status, .. } => *status >= 500 || *status == 429,
			_ => false,
		}
	}
}
