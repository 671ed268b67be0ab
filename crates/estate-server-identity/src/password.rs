// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Temporary credentials for newly provisioned accounts.
//!
//! A temporary credential is never shown to anyone. The owner sets their own
//! password through the reset link, so the credential only has to satisfy the
//! identity service's strength rules.

use estate_common_secret::SecretString;
use rand::Rng;

/// Shortest password the identity service accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

const RANDOM_LEN: usize = 8;
const RANDOM_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Appended so the credential always contains an uppercase letter, a digit and a symbol.
const SUFFIX: &str = "A1!";

/// Eight random lowercase alphanumerics followed by `A1!`.
pub fn generate_temporary_password() -> SecretString {
	let mut rng = rand::thread_rng();
	let mut password: String = (0..RANDOM_LEN)
		.map(|_| RANDOM_CHARSET[rng.gen_range(0..RANDOM_CHARSET.len())] as char)
		.collect();
	password.push_str(SUFFIX);
	SecretString::new(password)
}

/// Check a password against the identity service's minimum rules.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
	if password.chars().count() < MIN_PASSWORD_LEN {
		return Err(format!(
			"Password should be at least {MIN_PASSWORD_LEN} characters"
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn temporary_password_shape() {
		let password = generate_temporary_password();
		let password = password.expose();
		assert_eq!(password.len(), 11);
		assert!(password.ends_with("A1!"));
		assert!(password[..8]
			.chars()
			.all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
	}

	#[test]
	fn temporary_passwords_differ() {
		let passwords: HashSet<String> = (0..100)
			.map(|_| generate_temporary_password().expose().clone())
			.collect();
		assert!(passwords.len() > 95);
	}

	#[test]
	fn temporary_password_is_redacted_in_debug() {
		let password = generate_temporary_password();
		let debug = format!("{password:?}");
		assert!(!debug.contains(password.expose().as_str()));
	}

	#[test]
	fn short_passwords_are_weak() {
		assert!(validate_password_strength("abc").is_err());
		assert!(validate_password_strength("abcdef").is_ok());
	}
}
