// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Mutex;

use crate::error::DbError;
use crate::key::generate_key;
use crate::path::RecordPath;
use crate::server_value;
use crate::store::RecordStore;
use crate::tree;

/// Record store held in process memory. Contents are lost on drop.
#[derive(Debug)]
pub struct InMemoryRecordStore {
	root: Mutex<Value>,
}

impl Default for InMemoryRecordStore {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryRecordStore {
	pub fn new() -> Self {
		Self {
			root: Mutex::new(Value::Object(Map::new())),
		}
	}

	/// Seed the store with an initial tree.
	pub fn with_contents(contents: Value) -> Self {
		let root = match tree::normalize(contents) {
			Value::Null => Value::Object(Map::new()),
			value => value,
		};
		Self {
			root: Mutex::new(root),
		}
	}

	/// Copy of the whole tree.
	pub fn snapshot(&self) -> Result<Value, DbError> {
		Ok(self.lock()?.clone())
	}

	fn lock(&self) -> Result<std::sync::MutexGuard<'_, Value>, DbError> {
		self.root
			.lock()
			.map_err(|_| DbError::Internal("record store lock poisoned".to_string()))
	}
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
	#[tracing::instrument(skip(self), fields(path = %path))]
	async fn read(&self, path: &RecordPath) -> Result<Option<Value>, DbError> {
		let root = self.lock()?;
		Ok(tree::get_at(&root, path.segments())
			.filter(|v| !v.as_object().is_some_and(Map::is_empty))
			.cloned())
	}

	async fn allocate_key(&self, _parent: &RecordPath) -> Result<String, DbError> {
		Ok(generate_key())
	}

	#[tracing::instrument(skip(self, value), fields(path = %path))]
	async fn write(&self, path: &RecordPath, mut value: Value) -> Result<(), DbError> {
		if path.is_root() {
			return Err(DbError::InvalidPath("cannot write the root".to_string()));
		}
		server_value::resolve(&mut value, Utc::now().timestamp_millis())?;
		let value = tree::normalize(value);

		let mut root = self.lock()?;
		tree::set_at(&mut root, path.segments(), value);
		if root.is_null() {
			*root = Value::Object(Map::new());
		}
		tracing::debug!("record written");
		Ok(())
	}
}
