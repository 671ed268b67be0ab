// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Company (tenant) records.
//!
//! A [`Company`] lives under `companies/{id}`. Its `createdAt` is written as
//! [`Timestamp::Server`], a sentinel the record store replaces with its own
//! clock, so ordering never depends on the caller's clock.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Uid;

/// Key of the server-value sentinel object, `{".sv": "timestamp"}`.
pub const SERVER_VALUE_KEY: &str = ".sv";

/// Server-value name that resolves to the store's current time.
pub const SERVER_TIMESTAMP: &str = "timestamp";

/// Billing state of a company. New companies start in [`SubscriptionStatus::Trialing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
	Trialing,
	Active,
	PastDue,
	Canceled,
}

impl fmt::Display for SubscriptionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SubscriptionStatus::Trialing => write!(f, "trialing"),
			SubscriptionStatus::Active => write!(f, "active"),
			SubscriptionStatus::PastDue => write!(f, "past_due"),
			SubscriptionStatus::Canceled => write!(f, "canceled"),
		}
	}
}

/// A point in time as stored in records: milliseconds since the Unix epoch,
/// or a request for the store to fill in its own time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimestampRepr", into = "TimestampRepr")]
pub enum Timestamp {
	/// Resolved by the record store at write time.
	Server,
	Millis(i64),
}

impl Timestamp {
	pub fn now() -> Self {
		Timestamp::Millis(Utc::now().timestamp_millis())
	}

	pub fn millis(&self) -> Option<i64> {
		match self {
			Timestamp::Server => None,
			Timestamp::Millis(ms) => Some(*ms),
		}
	}

	pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
		self.millis()
			.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
	}
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
	Millis(i64),
	Server {
		#[serde(rename = ".sv")]
		sv: String,
	},
}

impl TryFrom<TimestampRepr> for Timestamp {
	type Error = String;

	fn try_from(repr: TimestampRepr) -> Result<Self, Self::Error> {
		match repr {
			TimestampRepr::Millis(ms) => Ok(Timestamp::Millis(ms)),
			TimestampRepr::Server { sv } if sv == SERVER_TIMESTAMP => Ok(Timestamp::Server),
			TimestampRepr::Server { sv } => Err(format!("unknown server value '{sv}'")),
		}
	}
}

impl From<Timestamp> for TimestampRepr {
	fn from(ts: Timestamp) -> Self {
		match ts {
			Timestamp::Server => TimestampRepr::Server {
				sv: SERVER_TIMESTAMP.to_string(),
			},
			Timestamp::Millis(ms) => TimestampRepr::Millis(ms),
		}
	}
}

/// A tenant of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
	pub name: String,

	/// Identity of the company's owner.
	pub owner_uid: Uid,

	/// Tier requested at provisioning time. Free-form; billing owns the catalogue.
	pub subscription_tier: String,

	pub subscription_status: SubscriptionStatus,

	pub property_count: i64,

	pub created_at: Timestamp,
}

impl Company {
	/// A new company in its trial period with no properties, stamped by the store.
	pub fn new_trial(name: impl Into<String>, owner_uid: Uid, tier: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			owner_uid,
			subscription_tier: tier.into(),
			subscription_status: SubscriptionStatus::Trialing,
			property_count: 0,
			created_at: Timestamp::Server,
		}
	}
}
