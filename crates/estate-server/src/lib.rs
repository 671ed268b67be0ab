// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Estate provisioning server.
//!
//! Exposes company provisioning as a callable endpoint over HTTP, with the
//! caller identified by an id token from the identity service.

pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod callable;
pub mod error;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use estate_server_config::ServerConfig;
