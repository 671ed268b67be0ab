// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity service integration for the Estate server.
//!
//! The server never stores credentials itself. Accounts live in an external
//! identity service reached through the [`IdentityProvider`] trait:
//!
//! - [`IdentityToolkitClient`] talks to an Identity Toolkit compatible REST API
//! - [`InMemoryIdentityProvider`] keeps accounts in memory for tests and local
//!   development
//!
//! # Security
//!
//! Passwords and the service access token are carried as [`SecretString`]
//! and never appear in `Debug` output or logs.
//!
//! [`SecretString`]: estate_common_secret::SecretString

pub mod error;
pub mod memory;
pub mod password;
pub mod provider;
pub mod rest;
pub mod testing;
pub mod types;

pub use error::IdentityError;
pub use memory::InMemoryIdentityProvider;
pub use password::{generate_temporary_password, validate_password_strength, MIN_PASSWORD_LEN};
pub use provider::IdentityProvider;
pub use rest::{IdentityToolkitClient, IdentityToolkitConfig, DEFAULT_BASE_URL};
pub use types::{IdentityRecord, NewIdentity, VerifiedToken};
