// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use estate_server_auth::{AuthContext, Caller, Company, CompanyId, SuperAdminPolicy, Uid, UserProfile};
use estate_server_db::{DbError, DirectoryRepository};
use estate_server_identity::{generate_temporary_password, IdentityError, IdentityProvider, NewIdentity};

use crate::error::ProvisioningError;
use crate::request::{ProvisionCompanyRequest, ProvisionCompanyResponse, ValidatedRequest};

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisioningError>;

/// Failure of a step that runs after the owner identity exists.
#[derive(Debug, thiserror::Error)]
enum StepError {
	#[error(transparent)]
	Store(#[from] DbError),

	#[error(transparent)]
	Identity(#[from] IdentityError),
}

/// Provisions companies on behalf of super-administrators.
#[derive(Clone)]
pub struct CompanyProvisioningService {
	identity: Arc<dyn IdentityProvider>,
	directory: DirectoryRepository,
	policy: SuperAdminPolicy,
}

impl CompanyProvisioningService {
	pub fn new(
		identity: Arc<dyn IdentityProvider>,
		directory: DirectoryRepository,
		policy: SuperAdminPolicy,
	) -> Self {
		Self {
			identity,
			directory,
			policy,
		}
	}

	/// Provision a company and its owner.
	///
	/// Checks run before anything is created, in this order: the caller must
	/// be authenticated, must be a super-administrator, and the request must
	/// name a company, an owner email and a tier.
	///
	/// Returns `Internal` if the identity service or the record store fails.
	/// Nothing created before the failure is rolled back.
	#[tracing::instrument(skip(self, auth, request), fields(caller_uid = tracing::field::Empty))]
	pub async fn provision_company(
		&self,
		auth: &AuthContext,
		request: ProvisionCompanyRequest,
	) -> Result<ProvisionCompanyResponse> {
		let caller = auth
			.require_caller()
			.map_err(|_| ProvisioningError::Unauthenticated)?;
		tracing::Span::current().record("caller_uid", caller.uid.as_str());

		self.authorize(caller).await?;
		let request = request.validate()?;

		let password = generate_temporary_password();
		let identity = self
			.identity
			.create_user(NewIdentity::unverified(&request.owner_email, password))
			.await
			.map_err(|e| {
				tracing::error!(error = %e, owner_email = %request.owner_email, "failed to create owner identity");
				ProvisioningError::internal(e)
			})?;
		let owner_uid = identity.uid;

		match self.create_company(&request, &owner_uid).await {
			Ok((company_id, reset_link)) => {
				tracing::info!(
					company_id = %company_id,
					owner_uid = %owner_uid,
					owner_email = %request.owner_email,
					tier = %request.tier,
					"company provisioned"
				);
				Ok(ProvisionCompanyResponse::new(company_id, owner_uid, reset_link))
			}
			Err(e) => {
				tracing::error!(
					error = %e,
					owner_uid = %owner_uid,
					owner_email = %request.owner_email,
					"company provisioning failed after owner identity was created; identity left orphaned"
				);
				Err(ProvisioningError::internal(e))
			}
		}
	}

	/// Require `caller` to be a super-administrator.
	async fn authorize(&self, caller: &Caller) -> Result<()> {
		let profile = self
			.directory
			.get_user_profile(&caller.uid)
			.await
			.map_err(|e| {
				tracing::error!(error = %e, "failed to load caller profile");
				ProvisioningError::internal(e)
			})?;

		if !self.policy.permits(caller, profile.as_ref()) {
			tracing::warn!(has_profile = profile.is_some(), "provisioning denied: caller is not a super administrator");
			return Err(ProvisioningError::PermissionDenied);
		}
		Ok(())
	}

	/// Company record, owner profile and reset link, in that order.
	async fn create_company(
		&self,
		request: &ValidatedRequest,
		owner_uid: &Uid,
	) -> std::result::Result<(CompanyId, String), StepError> {
		let company_id = self.directory.allocate_company_id().await?;
		let company = Company::new_trial(&request.company_name, owner_uid.clone(), &request.tier);
		self.directory.put_company(&company_id, &company).await?;

		let profile = UserProfile::company_owner(&request.owner_email, company_id.clone());
		self.directory.put_user_profile(owner_uid, &profile).await?;

		let reset_link = self
			.identity
			.generate_password_reset_link(&request.owner_email)
			.await?;

		Ok((company_id, reset_link))
	}
}
