// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed record store.
//!
//! Each row of `records` holds one JSON document keyed by its path. No stored
//! path is ever below another stored path:
//!
//! - a write at a path with a stored ancestor merges into that ancestor's document
//! - otherwise the write deletes all stored descendants and stores its own row
//!
//! Reads check the exact row, then an ancestor row, then assemble an object
//! from descendant rows.
//!
//! Writes read before they modify, so they take the write lock up front with
//! `BEGIN IMMEDIATE`. A deferred transaction would fail with `SQLITE_BUSY`
//! when another connection commits between its read and its first write.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};

use crate::error::DbError;
use crate::key::generate_key;
use crate::path::RecordPath;
use crate::server_value;
use crate::store::RecordStore;
use crate::tree;

#[derive(Clone)]
pub struct SqliteRecordStore {
	pool: SqlitePool,
}

impl SqliteRecordStore {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

/// Bounds selecting every path strictly below `path`.
///
/// `'/'` sorts immediately before `'0'`, so `[prefix/, prefix0)` covers
/// exactly the paths that start with `prefix/` under binary collation.
fn descendant_range(path: &RecordPath) -> (String, String) {
	if path.is_root() {
		return (String::new(), "\u{10FFFF}".to_string());
	}
	let base = path.to_string();
	(format!("{base}/"), format!("{base}0"))
}

async fn fetch_row(
	tx: &mut Transaction<'_, Sqlite>,
	path: &RecordPath,
) -> Result<Option<Value>, DbError> {
	let row: Option<(String,)> = sqlx::query_as("SELECT value FROM records WHERE path = ?")
		.bind(path.to_string())
		.fetch_optional(&mut **tx)
		.await?;
	row.map(|(raw,)| serde_json::from_str(&raw).map_err(DbError::from))
		.transpose()
}

async fn nearest_stored_ancestor(
	tx: &mut Transaction<'_, Sqlite>,
	path: &RecordPath,
) -> Result<Option<(RecordPath, Value)>, DbError> {
	for ancestor in path.ancestors() {
		if let Some(doc) = fetch_row(tx, &ancestor).await? {
			return Ok(Some((ancestor, doc)));
		}
	}
	Ok(None)
}

async fn store_row(
	tx: &mut Transaction<'_, Sqlite>,
	path: &RecordPath,
	value: &Value,
) -> Result<(), DbError> {
	let now = Utc::now().to_rfc3339();
	if value.is_null() {
		sqlx::query("DELETE FROM records WHERE path = ?")
			.bind(path.to_string())
			.execute(&mut **tx)
			.await?;
		return Ok(());
	}
	sqlx::query(
		r#"
		INSERT INTO records (path, value, updated_at)
		VALUES (?, ?, ?)
		ON CONFLICT(path) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
		"#,
	)
	.bind(path.to_string())
	.bind(serde_json::to_string(value)?)
	.bind(&now)
	.execute(&mut **tx)
	.await?;
	Ok(())
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
	#[tracing::instrument(skip(self), fields(path = %path))]
	async fn read(&self, path: &RecordPath) -> Result<Option<Value>, DbError> {
		let mut tx = self.pool.begin().await?;

		if !path.is_root() {
			if let Some(doc) = fetch_row(&mut tx, path).await? {
				tx.commit().await?;
				return Ok(Some(doc));
			}
			if let Some((ancestor, doc)) = nearest_stored_ancestor(&mut tx, path).await? {
				tx.commit().await?;
				let relative = path.relative_to(&ancestor).unwrap_or_default();
				return Ok(tree::get_at(&doc, relative).cloned());
			}
		}

		let (low, high) = descendant_range(path);
		let rows: Vec<(String, String)> =
			sqlx::query_as("SELECT path, value FROM records WHERE path >= ? AND path < ?")
				.bind(low)
				.bind(high)
				.fetch_all(&mut *tx)
				.await?;
		tx.commit().await?;

		if rows.is_empty() {
			return Ok(None);
		}
		let mut assembled = Value::Object(Map::new());
		for (row_path, raw) in rows {
			let row_path = RecordPath::parse(&row_path)?;
			let Some(relative) = row_path.relative_to(path) else {
				continue;
			};
			tree::set_at(&mut assembled, relative, serde_json::from_str(&raw)?);
		}
		Ok(Some(assembled).filter(|v| !v.as_object().is_some_and(Map::is_empty)))
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

		let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

		if let Some((ancestor, mut doc)) = nearest_stored_ancestor(&mut tx, path).await? {
			let relative = path.relative_to(&ancestor).unwrap_or_default();
			tree::set_at(&mut doc, relative, value);
			store_row(&mut tx, &ancestor, &tree::normalize(doc)).await?;
			tx.commit().await?;
			tracing::debug!(document = %ancestor, "record merged into ancestor");
			return Ok(());
		}

		let (low, high) = descendant_range(path);
		sqlx::query("DELETE FROM records WHERE path >= ? AND path < ?")
			.bind(low)
			.bind(high)
			.execute(&mut *tx)
			.await?;
		store_row(&mut tx, path, &value).await?;
		tx.commit().await?;

		tracing::debug!("record written");
		Ok(())
	}

	async fn ping(&self) -> Result<(), DbError> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}
}
