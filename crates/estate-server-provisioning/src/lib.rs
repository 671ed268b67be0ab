// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Company provisioning for Estate.
//!
//! A super-administrator provisions a new tenant in one call:
//! - an identity for the company owner, with a throwaway credential
//! - the company record, in its trial period
//! - the owner's profile, as administrator of the new company
//! - a password reset link the owner uses to take over the account
//!
//! The steps run in order against two independent services with no
//! transaction spanning them. A failure after the identity exists leaves it
//! behind; the service logs its uid so it can be reconciled.

mod error;
mod request;
mod service;

pub use error::{ProvisioningError, MISSING_FIELDS_MESSAGE, UNKNOWN_ERROR_MESSAGE};
pub use request::{ProvisionCompanyRequest, ProvisionCompanyResponse, SUCCESS_MESSAGE};
pub use service::CompanyProvisioningService;
