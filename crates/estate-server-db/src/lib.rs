// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record store for the Estate server.
//!
//! Records are JSON documents addressed by `/`-separated paths
//! (`users/{uid}`, `companies/{id}`). The [`RecordStore`] trait is the seam the
//! provisioning service depends on; [`SqliteRecordStore`] persists to SQLite
//! and [`InMemoryRecordStore`] backs tests and local development. Both share
//! the same hierarchical semantics:
//!
//! - a write replaces everything at and below its path
//! - a read returns the document at the path, the value nested inside an
//!   ancestor document, or an object assembled from descendant documents
//! - `{".sv": "timestamp"}` placeholders are replaced with the store's clock

pub mod directory;
pub mod error;
pub mod key;
pub mod memory;
pub mod path;
pub mod pool;
pub mod server_value;
pub mod sqlite;
pub mod store;
pub mod testing;
mod tree;

pub use directory::DirectoryRepository;
pub use error::{DbError, Result};
pub use key::generate_key;
pub use memory::InMemoryRecordStore;
pub use path::RecordPath;
pub use pool::{create_pool, run_migrations};
pub use sqlite::SqliteRecordStore;
pub use store::RecordStore;
