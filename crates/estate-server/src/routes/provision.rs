// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Company provisioning callable.

use axum::{
	extract::{rejection::JsonRejection, State},
	response::{IntoResponse, Response},
	Json,
};
use estate_server_provisioning::{ProvisionCompanyRequest, ProvisionCompanyResponse};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::auth_middleware::OptionalAuth;
use crate::callable::{
	take_data, CallableError, CallableErrorResponse, CallableResult, INVALID_BODY_MESSAGE,
};

/// Request envelope, for the API document.
#[derive(Debug, ToSchema)]
pub struct ProvisionCompanyCall {
	pub data: ProvisionCompanyRequest,
}

/// Success envelope, for the API document.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProvisionCompanyResult {
	pub result: ProvisionCompanyResponse,
}

#[utoipa::path(
    post,
    path = "/provisionCompany",
    request_body = ProvisionCompanyCall,
    responses(
        (status = 200, description = "Company and owner created", body = ProvisionCompanyResult),
        (status = 400, description = "Missing fields or malformed body", body = CallableErrorResponse),
        (status = 401, description = "No caller, or the id token failed verification", body = CallableErrorResponse),
        (status = 403, description = "Caller is not a super-administrator", body = CallableErrorResponse),
        (status = 500, description = "Identity service or record store failure", body = CallableErrorResponse)
    ),
    tag = "provisioning"
)]
/// POST /provisionCompany - Create a company and its owner account.
pub async fn provision_company(
	State(state): State<AppState>,
	OptionalAuth(auth): OptionalAuth,
	payload: Result<Json<Value>, JsonRejection>,
) -> Response {
	let body = match payload {
		Ok(Json(body)) => body,
		Err(rejection) => {
			tracing::debug!(error = %rejection, "rejected provisionCompany body");
			return CallableError::invalid_argument(INVALID_BODY_MESSAGE).into_response();
		}
	};

	let data = match take_data(body) {
		Ok(data) => data,
		Err(e) => return e.into_response(),
	};

	// A non-object payload carries none of the required fields.
	let request: ProvisionCompanyRequest = serde_json::from_value(data).unwrap_or_default();

	match state.provisioning.provision_company(&auth, request).await {
		Ok(response) => CallableResult { result: response }.into_response(),
		Err(e) => CallableError::from(e).into_response(),
	}
}
