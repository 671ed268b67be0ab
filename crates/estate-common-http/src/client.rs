// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// HTTP client builder with the standard Estate User-Agent header.
///
/// # Example
/// ```ignore
/// let client = estate_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard Estate User-Agent string.
///
/// Format: `estate/{version}/{os}-{arch}`
pub fn user_agent() -> String {
	format!(
		"estate/{}/{}-{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		assert!(ua.starts_with("estate/"));
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 3);
		assert_eq!(parts[0], "estate");
		assert!(parts[2].contains('-'));
	}

	#[test]
	fn builder_builds() {
		assert!(builder().timeout(Duration::from_secs(5)).build().is_ok());
	}
}
