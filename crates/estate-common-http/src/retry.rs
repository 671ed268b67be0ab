// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Retry with exponential backoff and jitter.
//!
//! Only errors that report themselves as transient through
//! [`RetryableError::is_retryable`] are retried. Everything else is returned
//! on the first failure.

use std::future::Future;
use std::time::Duration;

/// Errors that know whether retrying the operation could succeed.
pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}
		match self.status() {
			Some(status) => status.is_server_error() || status.as_u16() == 429,
			None => self.is_request(),
		}
	}
}

/// Backoff settings.
#[derive(Debug, Clone)]
pub struct RetryConfig {
	/// Total attempts including the first one.
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(5),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl RetryConfig {
	/// A config that never retries.
	pub fn no_retry() -> Self {
		Self {
			max_attempts: 1,
			..Default::default()
		}
	}

	/// Delay before the given retry (1-based: the delay after the first failure is `delay_for(1)`).
	pub fn delay_for(&self, retry: u32) -> Duration {
		let exp = self.backoff_factor.powi(retry.saturating_sub(1) as i32);
		let base_ms = self.base_delay.as_millis() as f64 * exp;
		let capped_ms = base_ms.min(self.max_delay.as_millis() as f64);
		let ms = if self.jitter {
			// Jitter in [capped/2, capped].
			capped_ms * (0.5 + fastrand::f64() * 0.5)
		} else {
			capped_ms
		};
		Duration::from_millis(ms.round() as u64)
	}
}

/// Run `op` until it succeeds, fails with a non-retryable error, or
/// `config.max_attempts` is exhausted.
pub async fn retry<T, E, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, E>
where
	E: RetryableError + std::fmt::Display,
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
{
	let max_attempts = config.max_attempts.max(1);
	let mut attempt = 1;
	loop {
		match op().await {
			Ok(value) => return Ok(value),
			Err(e) if attempt < max_attempts && e.is_retryable() => {
				let delay = config.delay_for(attempt);
				tracing::warn!(
					attempt,
					max_attempts,
					delay_ms = delay.as_millis() as u64,
					error = %e,
					"transient failure, retrying"
				);
				tokio::time::sleep(delay).await;
				attempt += 1;
			}
			Err(e) => return Err(e),
		}
	}
}
