// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use uuid::Uuid;

/// Generate a new child key.
///
/// Keys are UUIDv7 in simple (unhyphenated, lowercase hex) form, so they are
/// unique and sort in creation order.
pub fn generate_key() -> String {
	Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn keys_are_unique() {
		let keys: HashSet<_> = (0..1000).map(|_| generate_key()).collect();
		assert_eq!(keys.len(), 1000);
	}

	#[test]
	fn keys_are_valid_path_segments() {
		let key = generate_key();
		assert_eq!(key.len(), 32);
		assert!(crate::RecordPath::root().child(&key).is_ok());
	}

	#[test]
	fn keys_sort_in_creation_order() {
		let first = generate_key();
		std::thread::sleep(std::time::Duration::from_millis(2));
		let second = generate_key();
		assert!(first < second);
	}
}
