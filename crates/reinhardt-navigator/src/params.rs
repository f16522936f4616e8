//! Typed access to path parameters captured by a route pattern.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::NavigatorError;
use crate::pattern::{RoutePattern, Segment, split_segments};

/// Parameters extracted from a concrete path.
///
/// Keeps both the named map and the values in pattern order, so handlers can
/// read parameters by name or by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
	params: HashMap<String, String>,
	values: Vec<String>,
}

impl RouteParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Captures parameters of `pattern` from `path`.
	///
	/// Returns `None` if the path does not match the pattern.
	pub fn capture(pattern: &RoutePattern, path: &str) -> Option<Self> {
		if !pattern.matches(path) {
			return None;
		}
		let mut params = Self::new();
		for (segment, value) in pattern.segments().iter().zip(split_segments(path)) {
			if let Segment::Param(name) = segment {
				params.params.insert(name.clone(), value.to_string());
				params.values.push(value.to_string());
			}
		}
		Some(params)
	}

	/// Returns the raw value of a named parameter.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Parses a named parameter.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::MissingParameter`] if the name was not
	/// captured, or [`NavigatorError::ParamParse`] if parsing fails.
	pub fn parse<T>(&self, name: &str) -> Result<T, NavigatorError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		let raw = self
			.get(name)
			.ok_or_else(|| NavigatorError::MissingParameter(name.to_string()))?;
		raw.parse::<T>().map_err(|e| NavigatorError::ParamParse {
			name: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.to_string(),
			source_message: e.to_string(),
		})
	}

	/// Returns the parameter values in pattern order.
	pub fn values(&self) -> &[String] {
		&self.values
	}

	/// Returns the named parameter map.
	pub fn as_map(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Returns the number of parameters.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns whether there are no parameters.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn capture(pattern: &str, path: &str) -> RouteParams {
		let pattern = RoutePattern::new(pattern).unwrap();
		RouteParams::capture(&pattern, path).unwrap()
	}

	#[rstest]
	fn test_capture_keeps_order() {
		let params = capture("/orgs/:org/teams/:team", "/orgs/acme/teams/10");
		assert_eq!(params.values(), &["acme".to_string(), "10".to_string()]);
		assert_eq!(params.get("org"), Some("acme"));
		assert_eq!(params.len(), 2);
	}

	#[rstest]
	fn test_capture_mismatch() {
		let pattern = RoutePattern::new("/movies/:id").unwrap();
		assert!(RouteParams::capture(&pattern, "/series/1").is_none());
	}

	#[rstest]
	fn test_parse_typed() {
		let params = capture("/movies/:id", "/movies/42");
		let id: i64 = params.parse("id").unwrap();
		assert_eq!(id, 42);
	}

	#[rstest]
	fn test_parse_failure() {
		let params = capture("/movies/:id", "/movies/abc");
		let result = params.parse::<u32>("id");
		assert!(matches!(
			result,
			Err(NavigatorError::ParamParse { ref raw_value, .. }) if raw_value == "abc"
		));
	}

	#[rstest]
	fn test_parse_missing() {
		let params = capture("/movies", "/movies");
		assert!(params.is_empty());
		assert!(matches!(
			params.parse::<u32>("id"),
			Err(NavigatorError::MissingParameter(_))
		));
	}
}
