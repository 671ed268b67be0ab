// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain types shared by the Estate server crates.
//!
//! - [`types`]: key newtypes ([`Uid`], [`CompanyId`]) and [`Role`]
//! - [`user`]: the [`UserProfile`] record stored under `users/{uid}`
//! - [`company`]: the [`Company`] record stored under `companies/{id}`
//! - [`middleware`]: caller identity attached to a request ([`AuthContext`])
//! - [`policy`]: who may provision companies ([`SuperAdminPolicy`])

pub mod company;
pub mod middleware;
pub mod policy;
pub mod types;
pub mod user;

pub use company::{Company, SubscriptionStatus, Timestamp};
pub use middleware::{extract_bearer_token, AuthContext, AuthRequired, Caller};
pub use policy::SuperAdminPolicy;
pub use types::{CompanyId, Role, Uid};
pub use user::{username_from_email, UserProfile};
