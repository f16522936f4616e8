//! Error types for router tree management and history handling.
//!
//! Navigation itself never fails: unmatched paths, empty stacks and
//! unresolvable history targets degrade to no-ops or fallbacks. The errors
//! below cover structural misuse of the tree and data conversion failures.

use thiserror::Error;

use crate::tree::RouterId;

/// Errors produced by the navigator.
#[derive(Debug, Error)]
pub enum NavigatorError {
	/// A route pattern failed validation.
	#[error("invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The rejected pattern string.
		pattern: String,
		/// Why the pattern was rejected.
		reason: String,
	},

	/// No router with this id is mounted in the tree.
	#[error("unknown router: {0}")]
	UnknownRouter(RouterId),

	/// A sibling router with the same name is already mounted.
	#[error("router '{name}' is already mounted under {parent}")]
	DuplicateRouter {
		/// Parent router the mount was attempted on.
		parent: RouterId,
		/// Conflicting child name.
		name: String,
	},

	/// The root router lives as long as the tree and cannot be unmounted.
	#[error("the root router cannot be unmounted")]
	RootRouter,

	/// Reverse lookup of a route name that was never declared.
	#[error("invalid route name: {0}")]
	InvalidRouteName(String),

	/// Reverse lookup without a value for a pattern parameter.
	#[error("missing parameter: {0}")]
	MissingParameter(String),

	/// A path parameter could not be parsed into the requested type.
	#[error("failed to parse parameter '{name}' value '{raw_value}' as {param_type}: {source_message}")]
	ParamParse {
		/// Parameter name.
		name: String,
		/// Requested type name.
		param_type: &'static str,
		/// Raw segment value.
		raw_value: String,
		/// Message of the underlying parse error.
		source_message: String,
	},

	/// An argument codec could not encode or decode a value.
	#[error("argument codec failed: {0}")]
	ArgumentCodec(String),

	/// History record (de)serialization failed.
	#[error("history serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Settings could not be parsed.
	#[error("invalid navigator settings: {0}")]
	Settings(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	fn test_invalid_pattern_display() {
		let err = NavigatorError::InvalidPattern {
			pattern: "/users/:".to_string(),
			reason: "empty parameter name".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"invalid route pattern '/users/:': empty parameter name"
		);
	}

	#[rstest]
	fn test_param_parse_display() {
		let err = NavigatorError::ParamParse {
			name: "id".to_string(),
			param_type: "i64",
			raw_value: "abc".to_string(),
			source_message: "invalid digit found in string".to_string(),
		};
		let message = err.to_string();
		assert!(message.contains("'id'"));
		assert!(message.contains("abc"));
		assert!(message.contains("i64"));
	}

	#[rstest]
	fn test_serialization_from_json_error() {
		let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err: NavigatorError = json_err.into();
		assert!(matches!(err, NavigatorError::Serialization(_)));
	}
}
