// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolution of server-value placeholders.
//!
//! An object of exactly `{".sv": "timestamp"}` anywhere in a written value is
//! replaced with the store's current time in epoch milliseconds.

use estate_server_auth::company::{SERVER_TIMESTAMP, SERVER_VALUE_KEY};
use serde_json::Value;

use crate::error::DbError;

/// Replace placeholders in `value` in place, using `now_millis` for timestamps.
pub fn resolve(value: &mut Value, now_millis: i64) -> Result<(), DbError> {
	match value {
		Value::Object(map) => {
			if map.len() == 1 {
				if let Some(sv) = map.get(SERVER_VALUE_KEY) {
					return match sv.as_str() {
						Some(SERVER_TIMESTAMP) => {
							*value = Value::from(now_millis);
							Ok(())
						}
						_ => Err(DbError::InvalidValue(format!(
							"unsupported server value {sv}"
						))),
					};
				}
			}
			for child in map.values_mut() {
				resolve(child, now_millis)?;
			}
			Ok(())
		}
		Value::Array(items) => {
			for item in items {
				resolve(item, now_millis)?;
			}
			Ok(())
		}
		_ => Ok(()),
	}
}
