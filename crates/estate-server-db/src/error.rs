// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Record store failures.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// A path segment is empty or contains a reserved character.
	#[error("Invalid path: {0}")]
	InvalidPath(String),

	/// The value cannot be stored, e.g. an unknown server-value sentinel.
	#[error("Invalid value: {0}")]
	InvalidValue(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
