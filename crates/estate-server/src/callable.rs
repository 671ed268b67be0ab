// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Callable-function wire protocol.
//!
//! ```text
//! request:  {"data": <payload>}
//! success:  {"result": <payload>}
//! failure:  {"error": {"status": "PERMISSION_DENIED", "message": "..."}}
//! ```

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use estate_server_provisioning::ProvisioningError;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use utoipa::ToSchema;

pub const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object with a 'data' field.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired authentication token.";

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct CallableResult<T> {
	pub result: T,
}

impl<T: Serialize> IntoResponse for CallableResult<T> {
	fn into_response(self) -> Response {
		(StatusCode::OK, Json(self)).into_response()
	}
}

/// Error body carried inside the failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallableErrorDetail {
	#[schema(example = "PERMISSION_DENIED")]
	pub status: String,
	pub message: String,
}

/// Failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallableErrorResponse {
	pub error: CallableErrorDetail,
}

/// A failed call, ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableError {
	pub http_status: StatusCode,
	pub status: &'static str,
	pub message: String,
}

impl CallableError {
	pub fn unauthenticated(message: impl Into<String>) -> Self {
		Self {
			http_status: StatusCode::UNAUTHORIZED,
			status: "UNAUTHENTICATED",
			message: message.into(),
		}
	}

	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self {
			http_status: StatusCode::BAD_REQUEST,
			status: "INVALID_ARGUMENT",
			message: message.into(),
		}
	}

	pub fn internal(err: impl Display) -> Self {
		ProvisioningError::internal(err).into()
	}
}

fn http_status_for(err: &ProvisioningError) -> StatusCode {
	match err {
		ProvisioningError::Unauthenticated => StatusCode::UNAUTHORIZED,
		ProvisioningError::PermissionDenied => StatusCode::FORBIDDEN,
		ProvisioningError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
		ProvisioningError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

impl From<ProvisioningError> for CallableError {
	fn from(err: ProvisioningError) -> Self {
		Self {
			http_status: http_status_for(&err),
			status: err.status(),
			message: err.to_string(),
		}
	}
}

impl IntoResponse for CallableError {
	fn into_response(self) -> Response {
		let body = CallableErrorResponse {
			error: CallableErrorDetail {
				status: self.status.to_string(),
				message: self.message,
			},
		};
		(self.http_status, Json(body)).into_response()
	}
}

/// Take the `data` member out of a request body.
pub fn take_data(body: Value) -> Result<Value, CallableError> {
	match body {
		Value::Object(mut map) => map
			.remove("data")
			.ok_or_else(|| CallableError::invalid_argument(INVALID_BODY_MESSAGE)),
		_ => Err(CallableError::invalid_argument(INVALID_BODY_MESSAGE)),
	}
}
