// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server startup errors.

use estate_server_config::ConfigError;
use estate_server_db::DbError;
use estate_server_identity::IdentityError;

/// Failures while assembling or starting the server.
///
/// Request-level failures never use this type; they are answered with
/// [`CallableError`](crate::callable::CallableError).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("Database error: {0}")]
	Db(#[from] DbError),

	#[error("Identity service error: {0}")]
	Identity(#[from] IdentityError),

	/// A setting the selected backend needs is absent.
	#[error("Missing setting: {0}")]
	MissingSetting(&'static str),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
