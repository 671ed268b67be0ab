// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper types for Estate.
//!
//! [`Secret<T>`] holds a sensitive value (service access tokens, temporary
//! credentials, id tokens) and makes the safe thing the default:
//!
//! - `Debug` and `Display` print [`REDACTED`] instead of the value
//! - `Serialize` (with the `serde` feature) writes [`REDACTED`]
//! - the inner value is zeroized when the wrapper is dropped
//!
//! Reading the value requires an explicit call to [`Secret::expose`], which
//! makes every use site easy to audit.

use std::fmt;

use zeroize::Zeroize;

/// Placeholder printed wherever a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be logged.
pub struct Secret<T: Zeroize> {
	inner: T,
}

/// The common case: a secret string.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	/// Wrap a sensitive value.
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the underlying value.
	///
	/// Callers must not log or persist the returned reference.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.inner.zeroize();
	}
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T: Zeroize + Default> Default for Secret<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Secret({REDACTED})")
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

#[cfg(feature = "serde")]
impl<T: Zeroize> serde::Serialize for Secret<T> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(REDACTED)
	}
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Secret<T>
where
	T: Zeroize + serde::Deserialize<'de>,
{
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		T::deserialize(deserializer).map(Secret::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_is_redacted() {
		let secret = SecretString::new("hunter2".to_string());
		let debug = format!("{secret:?}");
		assert!(!debug.contains("hunter2"));
		assert!(debug.contains(REDACTED));
	}

	#[test]
	fn display_is_redacted() {
		let secret = SecretString::from("hunter2");
		assert_eq!(secret.to_string(), REDACTED);
	}

	#[test]
	fn expose_returns_value() {
		let secret = SecretString::from("hunter2");
		assert_eq!(secret.expose(), "hunter2");
	}

	#[test]
	fn clone_keeps_value() {
		let secret = SecretString::from("hunter2");
		let cloned = secret.clone();
		assert_eq!(cloned.expose(), secret.expose());
	}

	#[test]
	fn serialize_is_redacted() {
		let secret = SecretString::from("hunter2");
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));
	}

	#[test]
	fn deserialize_wraps_value() {
		let secret: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
		assert_eq!(secret.expose(), "hunter2");
	}

	#[test]
	fn redacted_inside_derived_debug() {
		#[derive(Debug)]
		struct Config {
			#[allow(dead_code)]
			token: SecretString,
		}

		let config = Config {
			token: SecretString::from("tok_live_abc"),
		};
		let debug = format!("{config:?}");
		assert!(!debug.contains("tok_live_abc"));
	}
}

#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn secret_never_in_debug_or_display(value in "[a-zA-Z0-9]{8,40}") {
			prop_assume!(!REDACTED.contains(&value));
			let secret = SecretString::new(value.clone());
			let debug_out = format!("{secret:?}");
			let display_out = format!("{secret}");
			prop_assert!(!debug_out.contains(&value));
			prop_assert!(!display_out.contains(&value));
		}
	}
}
