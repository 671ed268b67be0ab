// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record paths.
//!
//! A path is a sequence of non-empty segments written as `a/b/c`. Leading and
//! trailing slashes are ignored. The empty path is the root.

use std::fmt;

use crate::error::DbError;

/// Longest segment accepted, in bytes.
pub const MAX_SEGMENT_LEN: usize = 768;

const FORBIDDEN: &[char] = &['.', '#', '$', '[', ']', '/'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordPath {
	segments: Vec<String>,
}

impl RecordPath {
	pub fn root() -> Self {
		Self::default()
	}

	/// Parse `a/b/c`. Empty segments (`a//b`) are rejected.
	pub fn parse(path: &str) -> Result<Self, DbError> {
		let trimmed = path.trim_matches('/');
		if trimmed.is_empty() {
			return Ok(Self::root());
		}
		let segments = trimmed
			.split('/')
			.map(|segment| {
				validate_segment(segment)?;
				Ok(segment.to_string())
			})
			.collect::<Result<Vec<_>, DbError>>()?;
		Ok(Self { segments })
	}

	/// Build a path from individual segments, validating each one.
	pub fn from_segments<I, S>(segments: I) -> Result<Self, DbError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut path = Self::root();
		for segment in segments {
			path = path.child(segment.as_ref())?;
		}
		Ok(path)
	}

	pub fn child(&self, segment: &str) -> Result<Self, DbError> {
		validate_segment(segment)?;
		let mut segments = self.segments.clone();
		segments.push(segment.to_string());
		Ok(Self { segments })
	}

	pub fn parent(&self) -> Option<Self> {
		if self.segments.is_empty() {
			return None;
		}
		Some(Self {
			segments: self.segments[..self.segments.len() - 1].to_vec(),
		})
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Last segment, `None` for the root.
	pub fn key(&self) -> Option<&str> {
		self.segments.last().map(String::as_str)
	}

	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}

	pub fn depth(&self) -> usize {
		self.segments.len()
	}

	/// True when `other` lies strictly below this path.
	pub fn is_ancestor_of(&self, other: &RecordPath) -> bool {
		other.segments.len() > self.segments.len() && other.segments.starts_with(&self.segments)
	}

	/// Proper ancestors, nearest to the root first. The root itself is excluded.
	pub fn ancestors(&self) -> impl Iterator<Item = RecordPath> + '_ {
		(1..self.segments.len()).map(move |len| RecordPath {
			segments: self.segments[..len].to_vec(),
		})
	}

	/// Segments of `self` below `ancestor`. Empty when the paths are equal.
	pub fn relative_to(&self, ancestor: &RecordPath) -> Option<&[String]> {
		if self.segments.starts_with(&ancestor.segments) {
			Some(&self.segments[ancestor.segments.len()..])
		} else {
			None
		}
	}
}

impl fmt::Display for RecordPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.segments.join("/"))
	}
}

fn validate_segment(segment: &str) -> Result<(), DbError> {
	if segment.is_empty() {
		return Err(DbError::InvalidPath("empty path segment".to_string()));
	}
	if segment.len() > MAX_SEGMENT_LEN {
		return Err(DbError::InvalidPath(format!(
			"path segment longer than {MAX_SEGMENT_LEN} bytes"
		)));
	}
	if let Some(c) = segment
		.chars()
		.find(|c| FORBIDDEN.contains(c) || c.is_control())
	{
		return Err(DbError::InvalidPath(format!(
			"path segment '{}' contains forbidden character {c:?}",
			segment.escape_debug()
		)));
	}
	Ok(())
}
