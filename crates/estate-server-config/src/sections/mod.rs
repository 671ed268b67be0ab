// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod auth;
mod database;
mod http;
mod identity;
mod logging;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseBackend, DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use identity::{IdentityBackend, IdentityConfig, IdentityConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
