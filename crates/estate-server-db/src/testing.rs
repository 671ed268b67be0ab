// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers shared with downstream crates.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::{Arc, Mutex};

use crate::error::DbError;
use crate::path::RecordPath;
use crate::pool::run_migrations;
use crate::sqlite::SqliteRecordStore;
use crate::store::RecordStore;

/// Single-connection in-memory pool; every connection to `:memory:` is a new database.
pub async fn create_test_pool() -> SqlitePool {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.unwrap();
	run_migrations(&pool).await.unwrap();
	pool
}

pub async fn create_test_store() -> SqliteRecordStore {
	SqliteRecordStore::new(create_test_pool().await)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
	Read(String),
	AllocateKey(String),
	Write(String),
}

/// Wraps a store, recording every call and optionally failing writes.
pub struct RecordingStore {
	inner: Arc<dyn RecordStore>,
	ops: Mutex<Vec<StoreOp>>,
	fail_writes_under: Option<RecordPath>,
}

impl RecordingStore {
	pub fn new(inner: Arc<dyn RecordStore>) -> Self {
		Self {
			inner,
			ops: Mutex::new(Vec::new()),
			fail_writes_under: None,
		}
	}

	/// Fail writes at or below `prefix` with `DbError::Internal`.
	pub fn failing_writes_under(mut self, prefix: &str) -> Self {
		self.fail_writes_under = Some(RecordPath::parse(prefix).unwrap());
		self
	}

	pub fn ops(&self) -> Vec<StoreOp> {
		self.ops.lock().unwrap().clone()
	}

	pub fn writes(&self) -> Vec<String> {
		self.ops()
			.into_iter()
			.filter_map(|op| match op {
				StoreOp::Write(path) => Some(path),
				_ => None,
			})
			.collect()
	}

	fn record(&self, op: StoreOp) {
		self.ops.lock().unwrap().push(op);
	}
}

#[async_trait]
impl RecordStore for RecordingStore {
	async fn read(&self, path: &RecordPath) -> Result<Option<Value>, DbError> {
		self.record(StoreOp::Read(path.to_string()));
		self.inner.read(path).await
	}

	async fn allocate_key(&self, parent: &RecordPath) -> Result<String, DbError> {
		self.record(StoreOp::AllocateKey(parent.to_string()));
		self.inner.allocate_key(parent).await
	}

	async fn write(&self, path: &RecordPath, value: Value) -> Result<(), DbError> {
		self.record(StoreOp::Write(path.to_string()));
		if let Some(prefix) = &self.fail_writes_under {
			if prefix == path || prefix.is_ancestor_of(path) {
				return Err(DbError::Internal(format!("write to {path} refused")));
			}
		}
		self.inner.write(path, value).await
	}
}
