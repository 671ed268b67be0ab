// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity Toolkit REST client.
//!
//! All calls are `POST {base_url}/v1/projects/{project_id}/...` authorised
//! with a service access token:
//!
//! | Operation                          | Endpoint                  |
//! |------------------------------------|---------------------------|
//! | [`create_user`]                    | `accounts`                |
//! | [`generate_password_reset_link`]   | `accounts:sendOobCode`    |
//! | [`verify_id_token`]                | `accounts:lookup`         |
//!
//! Reset links and token lookups are retried on transient failures. Account
//! creation is not, since a lost response followed by a retry would report
//! the account as already existing.
//!
//! [`create_user`]: IdentityProvider::create_user
//! [`generate_password_reset_link`]: IdentityProvider::generate_password_reset_link
//! [`verify_id_token`]: IdentityProvider::verify_id_token

use std::time::Duration;

use async_trait::async_trait;
use estate_common_http::{retry, RetryConfig};
use estate_common_secret::SecretString;
use estate_server_auth::Uid;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::IdentityError;
use crate::provider::IdentityProvider;
use crate::types::{IdentityRecord, NewIdentity, VerifiedToken};

pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Connection settings for [`IdentityToolkitClient`].
#[derive(Debug, Clone)]
pub struct IdentityToolkitConfig {
	pub base_url: String,
	pub project_id: String,
	/// OAuth access token for the service account. Never logged.
	pub access_token: SecretString,
	pub timeout: Duration,
	pub retry: RetryConfig,
}

impl IdentityToolkitConfig {
	pub fn new(project_id: impl Into<String>, access_token: SecretString) -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			project_id: project_id.into(),
			access_token,
			timeout: Duration::from_secs(30),
			retry: RetryConfig::default(),
		}
	}

	pub fn validate(&self) -> Result<(), IdentityError> {
		if self.project_id.trim().is_empty() {
			return Err(IdentityError::Config("project_id cannot be empty".to_string()));
		}
		let url = Url::parse(&self.base_url)
			.map_err(|e| IdentityError::Config(format!("invalid base_url: {e}")))?;
		if url.scheme() != "https" && url.scheme() != "http" {
			return Err(IdentityError::Config(format!(
				"base_url must be http or https, got {}",
				url.scheme()
			)));
		}
		Ok(())
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
	local_id: String,
	#[serde(default)]
	email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeResponse {
	#[serde(default)]
	oob_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
	#[serde(default)]
	users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
	local_id: String,
	#[serde(default)]
	email: Option<String>,
	#[serde(default)]
	disabled: bool,
	/// JSON object encoded as a string.
	#[serde(default)]
	custom_attributes: Option<String>,
}

/// Client for an Identity Toolkit compatible account service.
#[derive(Debug, Clone)]
pub struct IdentityToolkitClient {
	config: IdentityToolkitConfig,
	http_client: reqwest::Client,
}

impl IdentityToolkitClient {
	#[tracing::instrument(skip_all, name = "IdentityToolkitClient::new")]
	pub fn new(config: IdentityToolkitConfig) -> Result<Self, IdentityError> {
		config.validate()?;
		let http_client = estate_common_http::builder()
			.timeout(config.timeout)
			.build()?;
		Ok(Self {
			config,
			http_client,
		})
	}

	fn endpoint(&self, operation: &str) -> String {
		format!(
			"{}/v1/projects/{}/{}",
			self.config.base_url.trim_end_matches('/'),
			self.config.project_id,
			operation
		)
	}

	async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T, IdentityError> {
		let response = self
			.http_client
			.post(url)
			.bearer_auth(self.config.access_token.expose())
			.json(body)
			.send()
			.await?;

		let status = response.status();
		let text = response.text().await?;
		if !status.is_success() {
			return Err(IdentityError::from_api_response(status.as_u16(), &text));
		}

		serde_json::from_str(&text)
			.map_err(|e| IdentityError::Parse(format!("unexpected response body: {e}")))
	}
}

fn parse_custom_attributes(raw: Option<&str>) -> Result<Map<String, Value>, IdentityError> {
	match raw.map(str::trim) {
		None | Some("") => Ok(Map::new()),
		Some(raw) => serde_json::from_str(raw)
			.map_err(|e| IdentityError::Parse(format!("invalid customAttributes: {e}"))),
	}
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
	#[tracing::instrument(skip(self, identity), name = "IdentityToolkitClient::create_user")]
	async fn create_user(&self, identity: NewIdentity) -> Result<IdentityRecord, IdentityError> {
		let url = self.endpoint("accounts");
		let body = json!({
			"email": identity.email,
			"password": identity.password.expose(),
			"emailVerified": identity.email_verified,
		});

		let response: SignUpResponse = self.post_json(&url, &body).await?;
		tracing::info!(uid = %response.local_id, "identity account created");

		Ok(IdentityRecord {
			uid: Uid::new(response.local_id),
			email: response.email.unwrap_or(identity.email),
			email_verified: identity.email_verified,
			disabled: false,
		})
	}

	#[tracing::instrument(skip(self, email), name = "IdentityToolkitClient::generate_password_reset_link")]
	async fn generate_password_reset_link(&self, email: &str) -> Result<String, IdentityError> {
		let url = self.endpoint("accounts:sendOobCode");
		let body = json!({
			"requestType": "PASSWORD_RESET",
			"email": email,
			"returnOobLink": true,
		});
		let (url, body) = (url.as_str(), &body);

		let response: OobCodeResponse =
			retry(&self.config.retry, move || self.post_json(url, body)).await?;

		response
			.oob_link
			.filter(|link| !link.is_empty())
			.ok_or_else(|| IdentityError::Parse("response did not include oobLink".to_string()))
	}

	#[tracing::instrument(skip(self, id_token), name = "IdentityToolkitClient::verify_id_token")]
	async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedToken, IdentityError> {
		let url = self.endpoint("accounts:lookup");
		let body = json!({ "idToken": id_token });
		let (url, body) = (url.as_str(), &body);

		let response: LookupResponse =
			match retry(&self.config.retry, move || self.post_json(url, body)).await {
				Err(IdentityError::UserNotFound) => return Err(IdentityError::InvalidToken),
				other => other?,
			};

		let user = response
			.users
			.into_iter()
			.next()
			.ok_or(IdentityError::InvalidToken)?;
		if user.disabled {
			return Err(IdentityError::InvalidToken);
		}

		Ok(VerifiedToken {
			uid: Uid::new(user.local_id),
			email: user.email,
			claims: parse_custom_attributes(user.custom_attributes.as_deref())?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{body_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	const PROJECT: &str = "estate-test";

	fn client_for(server: &MockServer) -> IdentityToolkitClient {
		let mut config =
			IdentityToolkitConfig::new(PROJECT, SecretString::new("service-token".to_string()));
		config.base_url = server.uri();
		config.retry = RetryConfig {
			base_delay: Duration::from_millis(1),
			max_delay: Duration::from_millis(2),
			..RetryConfig::default()
		};
		IdentityToolkitClient::new(config).unwrap()
	}

	fn error_body(message: &str) -> Value {
		json!({"error": {"code": 400, "message": message, "status": "INVALID_ARGUMENT"}})
	}

	#[tokio::test]
	async fn create_user_posts_unverified_account() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts")))
			.and(header("authorization", "Bearer service-token"))
			.and(body_json(json!({
				"email": "owner@acme.com",
				"password": "abcdefghA1!",
				"emailVerified": false,
			})))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(json!({"localId": "uid-1", "email": "owner@acme.com"})),
			)
			.expect(1)
			.mount(&server)
			.await;

		let record = client_for(&server)
			.create_user(NewIdentity::unverified(
				"owner@acme.com",
				SecretString::new("abcdefghA1!".to_string()),
			))
			.await
			.unwrap();

		assert_eq!(record.uid, Uid::from("uid-1"));
		assert_eq!(record.email, "owner@acme.com");
		assert!(!record.email_verified);
	}

	#[tokio::test]
	async fn create_user_maps_email_exists() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts")))
			.respond_with(ResponseTemplate::new(400).set_body_json(error_body("EMAIL_EXISTS")))
			.expect(1)
			.mount(&server)
			.await;

		let err = client_for(&server)
			.create_user(NewIdentity::unverified(
				"owner@acme.com",
				SecretString::new("abcdefghA1!".to_string()),
			))
			.await
			.unwrap_err();
		assert!(matches!(err, IdentityError::EmailExists));
	}

	#[tokio::test]
	async fn create_user_is_not_retried() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts")))
			.respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
			.expect(1)
			.mount(&server)
			.await;

		let err = client_for(&server)
			.create_user(NewIdentity::unverified(
				"owner@acme.com",
				SecretString::new("abcdefghA1!".to_string()),
			))
			.await
			.unwrap_err();
		assert!(matches!(err, IdentityError::Api { status: 503, .. }));
	}

	#[tokio::test]
	async fn reset_link_requests_oob_link() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:sendOobCode")))
			.and(body_json(json!({
				"requestType": "PASSWORD_RESET",
				"email": "owner@acme.com",
				"returnOobLink": true,
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"email": "owner@acme.com",
				"oobLink": "https://estate.example/reset?oobCode=xyz",
			})))
			.mount(&server)
			.await;

		let link = client_for(&server)
			.generate_password_reset_link("owner@acme.com")
			.await
			.unwrap();
		assert_eq!(link, "https://estate.example/reset?oobCode=xyz");
	}

	#[tokio::test]
	async fn reset_link_retries_transient_failures() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:sendOobCode")))
			.respond_with(ResponseTemplate::new(500).set_body_string("boom"))
			.up_to_n_times(2)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:sendOobCode")))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(json!({"oobLink": "https://x/reset"})),
			)
			.mount(&server)
			.await;

		let link = client_for(&server)
			.generate_password_reset_link("owner@acme.com")
			.await
			.unwrap();
		assert_eq!(link, "https://x/reset");
	}

	#[tokio::test]
	async fn reset_link_without_link_is_parse_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:sendOobCode")))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.c"})))
			.mount(&server)
			.await;

		let err = client_for(&server)
			.generate_password_reset_link("a@b.c")
			.await
			.unwrap_err();
		assert!(matches!(err, IdentityError::Parse(_)));
	}

	#[tokio::test]
	async fn verify_id_token_returns_uid_and_claims() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
			.and(body_json(json!({"idToken": "tok"})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"users": [{
					"localId": "admin-uid",
					"email": "root@estate.dev",
					"customAttributes": "{\"superAdmin\":true}",
				}]
			})))
			.mount(&server)
			.await;

		let token = client_for(&server).verify_id_token("tok").await.unwrap();
		assert_eq!(token.uid, Uid::from("admin-uid"));
		assert_eq!(token.email.as_deref(), Some("root@estate.dev"));
		assert_eq!(token.claims.get("superAdmin"), Some(&json!(true)));
	}

	#[tokio::test]
	async fn verify_id_token_rejects_invalid_tokens() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
			.respond_with(ResponseTemplate::new(400).set_body_json(error_body("INVALID_ID_TOKEN")))
			.mount(&server)
			.await;

		let err = client_for(&server).verify_id_token("bad").await.unwrap_err();
		assert!(matches!(err, IdentityError::InvalidToken));
	}

	#[tokio::test]
	async fn verify_id_token_with_no_users_is_invalid() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
			.mount(&server)
			.await;

		let err = client_for(&server).verify_id_token("tok").await.unwrap_err();
		assert!(matches!(err, IdentityError::InvalidToken));
	}

	#[test]
	fn config_debug_hides_access_token() {
		let config =
			IdentityToolkitConfig::new(PROJECT, SecretString::new("super-secret-token".to_string()));
		let debug = format!("{config:?}");
		assert!(!debug.contains("super-secret-token"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn config_validation() {
		let mut config = IdentityToolkitConfig::new("", SecretString::new("t".to_string()));
		assert!(matches!(config.validate(), Err(IdentityError::Config(_))));

		config.project_id = PROJECT.to_string();
		assert!(config.validate().is_ok());

		config.base_url = "ftp://example.com".to_string();
		assert!(config.validate().is_err());

		config.base_url = "not a url".to_string();
		assert!(config.validate().is_err());
	}

	#[test]
	fn endpoint_joins_base_and_project() {
		let mut config = IdentityToolkitConfig::new(PROJECT, SecretString::new("t".to_string()));
		config.base_url = "http://localhost:9099/".to_string();
		let client = IdentityToolkitClient::new(config).unwrap();
		assert_eq!(
			client.endpoint("accounts:lookup"),
			"http://localhost:9099/v1/projects/estate-test/accounts:lookup"
		);
	}

	#[test]
	fn custom_attributes_parsing() {
		assert!(parse_custom_attributes(None).unwrap().is_empty());
		assert!(parse_custom_attributes(Some("")).unwrap().is_empty());
		assert!(parse_custom_attributes(Some("not json")).is_err());
	}
}
