//! Navigator settings.
//!
//! Settings can be built in code or loaded from a TOML fragment:
//!
//! ```
//! use reinhardt_navigator::NavigatorSettings;
//!
//! let settings = NavigatorSettings::from_toml_str(
//!     r#"
//!     root_name = "app"
//!     max_redirect_hops = 3
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.root_name, "app");
//! assert_eq!(settings.max_redirect_hops, 3);
//! assert!(settings.defer_path_notifications);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::NavigatorError;

/// Default bound on consecutive redirects within one push.
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 8;

/// Tunables of a [`RouterTree`](crate::RouterTree).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSettings {
	/// Name of the root router. History records naming it, or naming no
	/// router, restore into the root.
	pub root_name: String,
	/// Redirect hops allowed within a single push before it is dropped.
	pub max_redirect_hops: usize,
	/// Deliver path-changed notifications through the deferred task queue.
	/// When `false` they are sent synchronously at the end of the mutation.
	pub defer_path_notifications: bool,
}

impl Default for NavigatorSettings {
	fn default() -> Self {
		Self {
			root_name: String::new(),
			max_redirect_hops: DEFAULT_MAX_REDIRECT_HOPS,
			defer_path_notifications: true,
		}
	}
}

impl NavigatorSettings {
	/// Parses settings from TOML. Missing keys keep their defaults.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::Settings`] on malformed TOML or wrong types.
	pub fn from_toml_str(source: &str) -> Result<Self, NavigatorError> {
		Ok(toml::from_str(source)?)
	}

	/// Sets the root router name.
	pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
		self.root_name = name.into();
		self
	}

	/// Sets the redirect hop limit.
	pub fn with_max_redirect_hops(mut self, hops: usize) -> Self {
		self.max_redirect_hops = hops;
		self
	}

	/// Chooses deferred or synchronous path-changed delivery.
	pub fn with_deferred_path_notifications(mut self, deferred: bool) -> Self {
		self.defer_path_notifications = deferred;
		self
	}
}
