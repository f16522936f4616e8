//! Path pattern matching for navigation routes.
//!
//! Patterns are split on `/` into positional segments. A segment starting
//! with `:` is a named parameter that matches any single non-empty segment:
//!
//! - `/movies` - exact match
//! - `/movies/:id` - one parameter
//! - `/movies/:id/cast/:person` - several parameters
//!
//! Matching is strictly positional and gated on the segment count, so a
//! pattern never matches a path with more or fewer segments. Empty segments
//! are ignored on both sides, which makes `/movies/` and `/movies` the same
//! path and gives `/` zero segments.

use std::collections::HashMap;

use crate::error::NavigatorError;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of segments in a pattern.
const MAX_PATTERN_SEGMENTS: usize = 32;

/// Marker prefix of a parameter segment.
const PARAM_MARKER: char = ':';

/// One positional segment of a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Must equal the concrete segment exactly.
	Literal(String),
	/// Matches any non-empty concrete segment and captures it under this name.
	Param(String),
}

/// A compiled, immutable route template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original pattern string.
	pattern: String,
	/// Segments in declaration order.
	segments: Vec<Segment>,
}

/// Splits a path into its non-empty segments.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|segment| !segment.is_empty())
}

impl RoutePattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::InvalidPattern`] if:
	/// - the pattern exceeds 1024 bytes
	/// - the pattern has more than 32 segments
	/// - a parameter segment has an empty name (a bare `:`)
	/// - two parameters share a name
	pub fn new(pattern: &str) -> Result<Self, NavigatorError> {
		let invalid = |reason: String| NavigatorError::InvalidPattern {
			pattern: pattern.to_string(),
			reason,
		};

		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}

		let mut segments = Vec::new();
		for raw in split_segments(pattern) {
			let segment = match raw.strip_prefix(PARAM_MARKER) {
				Some("") => return Err(invalid("empty parameter name".to_string())),
				Some(name) => {
					let duplicate = segments
						.iter()
						.any(|s| matches!(s, Segment::Param(existing) if existing == name));
					if duplicate {
						return Err(invalid(format!("duplicate parameter '{}'", name)));
					}
					Segment::Param(name.to_string())
				}
				None => Segment::Literal(raw.to_string()),
			};
			segments.push(segment);
		}

		if segments.len() > MAX_PATTERN_SEGMENTS {
			return Err(invalid(format!(
				"{} segments exceed maximum of {}",
				segments.len(),
				MAX_PATTERN_SEGMENTS
			)));
		}

		Ok(Self {
			pattern: pattern.to_string(),
			segments,
		})
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the compiled segments.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| match segment {
				Segment::Param(name) => Some(name.as_str()),
				Segment::Literal(_) => None,
			})
			.collect()
	}

	/// Returns whether this pattern has no parameters.
	pub fn is_exact(&self) -> bool {
		self.segments
			.iter()
			.all(|segment| matches!(segment, Segment::Literal(_)))
	}

	/// Checks whether a concrete path matches this pattern.
	pub fn matches(&self, path: &str) -> bool {
		let mut concrete = split_segments(path);
		for segment in &self.segments {
			let Some(value) = concrete.next() else {
				return false;
			};
			match segment {
				Segment::Literal(literal) if literal != value => return false,
				_ => {}
			}
		}
		concrete.next().is_none()
	}

	/// Pairs each parameter with its concrete segment.
	///
	/// Returns `None` when the path does not match.
	pub fn extract_params(&self, path: &str) -> Option<HashMap<String, String>> {
		if !self.matches(path) {
			return None;
		}
		let params = self
			.segments
			.iter()
			.zip(split_segments(path))
			.filter_map(|(segment, value)| match segment {
				Segment::Param(name) => Some((name.clone(), value.to_string())),
				Segment::Literal(_) => None,
			})
			.collect();
		Some(params)
	}

	/// Builds a concrete path by substituting every parameter.
	///
	/// Returns `None` if a parameter value is missing or empty.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut path = String::new();
		for segment in &self.segments {
			path.push('/');
			match segment {
				Segment::Literal(literal) => path.push_str(literal),
				Segment::Param(name) => {
					let value = params.get(name).filter(|v| !v.is_empty())?;
					path.push_str(value);
				}
			}
		}
		if path.is_empty() {
			path.push('/');
		}
		Some(path)
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.segments == other.segments
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}
