// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for navigating JSON trees by path segments.

use serde_json::{Map, Value};

/// Drop `null` members and empty objects. Returns `Value::Null` when nothing is left.
pub(crate) fn normalize(value: Value) -> Value {
	match value {
		Value::Object(map) => {
			let map: Map<String, Value> = map
				.into_iter()
				.map(|(k, v)| (k, normalize(v)))
				.filter(|(_, v)| !v.is_null())
				.collect();
			if map.is_empty() {
				Value::Null
			} else {
				Value::Object(map)
			}
		}
		other => other,
	}
}

pub(crate) fn get_at<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
	segments
		.iter()
		.try_fold(value, |node, segment| node.as_object()?.get(segment))
		.filter(|v| !v.is_null())
}

/// Set `new` at `segments` below `node`, creating intermediate objects and
/// replacing any scalar in the way. A `null` removes the entry and prunes
/// parents left empty.
pub(crate) fn set_at(node: &mut Value, segments: &[String], new: Value) {
	let Some((first, rest)) = segments.split_first() else {
		*node = new;
		return;
	};
	if !node.is_object() {
		if new.is_null() {
			return;
		}
		*node = Value::Object(Map::new());
	}
	let Value::Object(map) = node else {
		return;
	};
	if rest.is_empty() {
		if new.is_null() {
			map.remove(first);
		} else {
			map.insert(first.clone(), new);
		}
		return;
	}
	if new.is_null() && !map.contains_key(first) {
		return;
	}
	let child = map.entry(first.clone()).or_insert(Value::Null);
	set_at(child, rest, new);
	if child.is_null() || child.as_object().is_some_and(Map::is_empty) {
		map.remove(first);
	}
}
