// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use estate_server_auth::{CompanyId, Uid};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ProvisioningError;

pub const SUCCESS_MESSAGE: &str = "Company provisioned successfully.";

/// Request to provision a company.
///
/// Every field is optional on the wire. A field that is absent, not a string,
/// or blank is reported as missing by [`ProvisionCompanyRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionCompanyRequest {
	#[serde(default, deserialize_with = "string_or_none")]
	#[schema(example = "Acme")]
	pub company_name: Option<String>,

	#[serde(default, deserialize_with = "string_or_none")]
	#[schema(example = "owner@acme.com")]
	pub owner_email: Option<String>,

	/// Subscription tier. Not checked against a catalogue.
	#[serde(default, deserialize_with = "string_or_none")]
	#[schema(example = "pro")]
	pub tier: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		Some(Value::String(s)) => Some(s),
		_ => None,
	})
}

/// A request whose fields are all present, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedRequest {
	pub company_name: String,
	pub owner_email: String,
	pub tier: String,
}

impl ProvisionCompanyRequest {
	pub fn new(
		company_name: impl Into<String>,
		owner_email: impl Into<String>,
		tier: impl Into<String>,
	) -> Self {
		Self {
			company_name: Some(company_name.into()),
			owner_email: Some(owner_email.into()),
			tier: Some(tier.into()),
		}
	}

	pub(crate) fn validate(&self) -> Result<ValidatedRequest, ProvisioningError> {
		fn required(field: &Option<String>) -> Option<String> {
			field
				.as_deref()
				.map(str::trim)
				.filter(|value| !value.is_empty())
				.map(str::to_string)
		}

		match (
			required(&self.company_name),
			required(&self.owner_email),
			required(&self.tier),
		) {
			(Some(company_name), Some(owner_email), Some(tier)) => Ok(ValidatedRequest {
				company_name,
				owner_email,
				tier,
			}),
			_ => Err(ProvisioningError::missing_fields()),
		}
	}
}

/// Result of a successful provisioning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionCompanyResponse {
	/// Always `true`; failures are reported as errors.
	pub success: bool,

	#[schema(value_type = String)]
	pub company_id: CompanyId,

	#[schema(value_type = String)]
	pub owner_uid: Uid,

	#[schema(example = "Company provisioned successfully.")]
	pub message: String,

	/// One-time link for the owner to set their password. Not emailed.
	pub reset_link: String,
}

impl ProvisionCompanyResponse {
	pub fn new(company_id: CompanyId, owner_uid: Uid, reset_link: String) -> Self {
		Self {
			success: true,
			company_id,
			owner_uid,
			message: SUCCESS_MESSAGE.to_string(),
			reset_link,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn deserializes_camel_case() {
		let request: ProvisionCompanyRequest = serde_json::from_value(json!({
			"companyName": "Acme",
			"ownerEmail": "owner@acme.com",
			"tier": "pro",
		}))
		.unwrap();
		assert_eq!(
			request,
			ProvisionCompanyRequest::new("Acme", "owner@acme.com", "pro")
		);
	}

	#[test]
	fn missing_and_non_string_fields_deserialize_as_none() {
		let request: ProvisionCompanyRequest = serde_json::from_value(json!({
			"companyName": 42,
			"ownerEmail": null,
		}))
		.unwrap();
		assert_eq!(request, ProvisionCompanyRequest::default());
	}

	#[test]
	fn validate_accepts_complete_request() {
		let validated = ProvisionCompanyRequest::new(" Acme ", "owner@acme.com", "pro")
			.validate()
			.unwrap();
		assert_eq!(validated.company_name, "Acme");
		assert_eq!(validated.owner_email, "owner@acme.com");
		assert_eq!(validated.tier, "pro");
	}

	#[test]
	fn validate_rejects_missing_fields() {
		let missing_tier = ProvisionCompanyRequest {
			tier: None,
			..ProvisionCompanyRequest::new("Acme", "owner@acme.com", "")
		};
		assert_eq!(
			missing_tier.validate(),
			Err(ProvisioningError::missing_fields())
		);
	}

	#[test]
	fn validate_rejects_blank_fields() {
		for request in [
			ProvisionCompanyRequest::new("", "owner@acme.com", "pro"),
			ProvisionCompanyRequest::new("Acme", "   ", "pro"),
			ProvisionCompanyRequest::new("Acme", "owner@acme.com", "\t"),
		] {
			assert_eq!(request.validate(), Err(ProvisioningError::missing_fields()));
		}
	}

	#[test]
	fn response_serializes_camel_case() {
		let response = ProvisionCompanyResponse::new(
			CompanyId::from("c1"),
			Uid::from("u1"),
			"https://reset".to_string(),
		);
		assert_eq!(
			serde_json::to_value(&response).unwrap(),
			json!({
				"success": true,
				"companyId": "c1",
				"ownerUid": "u1",
				"message": "Company provisioned successfully.",
				"resetLink": "https://reset",
			})
		);
	}
}
