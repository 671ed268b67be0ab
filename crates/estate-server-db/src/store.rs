// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DbError;
use crate::path::RecordPath;

/// Hierarchical JSON record store.
///
/// Implementations must be safe to share across concurrent requests. Each
/// individual write is atomic; there are no multi-path transactions.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Value at `path`, or `None` when nothing is stored there.
	async fn read(&self, path: &RecordPath) -> Result<Option<Value>, DbError>;

	/// Reserve a fresh, unique child key under `parent`. Nothing is written.
	async fn allocate_key(&self, parent: &RecordPath) -> Result<String, DbError>;

	/// Replace everything at and below `path` with `value`.
	///
	/// Server-value placeholders are resolved before storing. Writing `null`
	/// deletes the subtree. The root cannot be written.
	async fn write(&self, path: &RecordPath, value: Value) -> Result<(), DbError>;

	/// Check the backing storage is reachable.
	async fn ping(&self) -> Result<(), DbError> {
		Ok(())
	}
}
