// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed access to the `users` and `companies` collections.

use estate_server_auth::{Company, CompanyId, Uid, UserProfile};
use serde_json::Value;
use std::sync::Arc;

use crate::error::DbError;
use crate::path::RecordPath;
use crate::store::RecordStore;

pub const USERS: &str = "users";
pub const COMPANIES: &str = "companies";

#[derive(Clone)]
pub struct DirectoryRepository {
	store: Arc<dyn RecordStore>,
}

impl DirectoryRepository {
	pub fn new(store: Arc<dyn RecordStore>) -> Self {
		Self { store }
	}

	pub fn store(&self) -> &Arc<dyn RecordStore> {
		&self.store
	}

	pub fn user_path(uid: &Uid) -> Result<RecordPath, DbError> {
		RecordPath::from_segments([USERS, uid.as_str()])
	}

	pub fn company_path(id: &CompanyId) -> Result<RecordPath, DbError> {
		RecordPath::from_segments([COMPANIES, id.as_str()])
	}

	/// Load the profile at `users/{uid}`. A stored value that is not an object
	/// carries no profile fields and reads as absent.
	#[tracing::instrument(skip(self), fields(uid = %uid))]
	pub async fn get_user_profile(&self, uid: &Uid) -> Result<Option<UserProfile>, DbError> {
		let path = Self::user_path(uid)?;
		match self.store.read(&path).await? {
			Some(value @ Value::Object(_)) => Ok(Some(serde_json::from_value(value)?)),
			Some(_) => {
				tracing::debug!("stored profile is not an object");
				Ok(None)
			}
			None => Ok(None),
		}
	}

	#[tracing::instrument(skip(self, profile), fields(uid = %uid))]
	pub async fn put_user_profile(&self, uid: &Uid, profile: &UserProfile) -> Result<(), DbError> {
		let path = Self::user_path(uid)?;
		self.store.write(&path, serde_json::to_value(profile)?).await
	}

	/// Reserve a key for a new company. Nothing is written.
	#[tracing::instrument(skip(self))]
	pub async fn allocate_company_id(&self) -> Result<CompanyId, DbError> {
		let parent = RecordPath::parse(COMPANIES)?;
		let key = self.store.allocate_key(&parent).await?;
		Ok(CompanyId::new(key))
	}

	#[tracing::instrument(skip(self, company), fields(company_id = %id))]
	pub async fn put_company(&self, id: &CompanyId, company: &Company) -> Result<(), DbError> {
		let path = Self::company_path(id)?;
		self.store.write(&path, serde_json::to_value(company)?).await
	}

	#[tracing::instrument(skip(self), fields(company_id = %id))]
	pub async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError> {
		let path = Self::company_path(id)?;
		match self.store.read(&path).await? {
			Some(value) => Ok(Some(serde_json::from_value(value)?)),
			None => Ok(None),
		}
	}
}
