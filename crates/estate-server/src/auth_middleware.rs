// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] verifies a bearer id token with the identity service and
//! stores the resulting [`AuthContext`] as a request extension. Requests
//! without a token continue unauthenticated; the handler decides whether
//! that is acceptable. A token the identity service rejects is answered here
//! with `UNAUTHENTICATED`. When the identity service cannot be reached or
//! answers with an error, the request fails with `INTERNAL`.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/provisionCompany", post(provision_company))
//!     .route_layer(from_fn_with_state(state.clone(), auth_layer));
//! ```

use axum::{
	extract::{FromRequestParts, Request, State},
	http::request::Parts,
	middleware::Next,
	response::{IntoResponse, Response},
};
use estate_server_auth::{extract_bearer_token, AuthContext, Caller};
use estate_server_identity::IdentityError;
use tracing::instrument;

use crate::api::AppState;
use crate::callable::{CallableError, INVALID_TOKEN_MESSAGE};

/// Attach the caller's [`AuthContext`] to the request.
///
/// Tokens are never logged; on success only the uid is recorded.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(uid = tracing::field::Empty)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request,
	next: Next,
) -> Response {
	let Some(token) = extract_bearer_token(request.headers()).map(str::to_owned) else {
		tracing::debug!("no bearer token, continuing unauthenticated");
		request
			.extensions_mut()
			.insert(AuthContext::unauthenticated());
		return next.run(request).await;
	};

	match state.identity.verify_id_token(&token).await {
		Ok(verified) => {
			tracing::Span::current().record("uid", tracing::field::display(&verified.uid));
			request
				.extensions_mut()
				.insert(AuthContext::authenticated(Caller::from(verified)));
			next.run(request).await
		}
		Err(IdentityError::InvalidToken) => {
			tracing::debug!("bearer token rejected by identity service");
			CallableError::unauthenticated(INVALID_TOKEN_MESSAGE).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to verify bearer token");
			CallableError::internal(&e).into_response()
		}
	}
}

/// Extractor for the caller's [`AuthContext`].
///
/// Always succeeds; yields an unauthenticated context when [`auth_layer`]
/// did not run or found no token.
pub struct OptionalAuth(pub AuthContext);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	#[instrument(name = "OptionalAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth_ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		match auth_ctx.caller() {
			Some(caller) => tracing::debug!(uid = %caller.uid, "Optional auth: authenticated"),
			None => tracing::debug!("Optional auth: unauthenticated"),
		}

		Ok(OptionalAuth(auth_ctx))
	}
}
