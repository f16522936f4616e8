//! Route entries and the primitive operations on a stack of them.
//!
//! Entries are never mutated in place: a re-push removes the old entry and
//! appends a new one.

use crate::argument::RouteArgument;
use crate::tree::RouterId;

/// A live element of a navigation stack.
#[derive(Debug, Clone)]
pub struct RouteEntry {
	path: String,
	argument: Option<RouteArgument>,
	router: RouterId,
}

impl RouteEntry {
	/// Creates an entry owned by `router`.
	pub fn new(router: RouterId, path: impl Into<String>, argument: Option<RouteArgument>) -> Self {
		Self {
			path: path.into(),
			argument,
			router,
		}
	}

	/// Returns the concrete path, which is also the entry's identity key.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the argument the entry was pushed with.
	pub fn argument(&self) -> Option<&RouteArgument> {
		self.argument.as_ref()
	}

	/// Returns the router that pushed the entry.
	pub fn router(&self) -> RouterId {
		self.router
	}

	fn is(&self, router: RouterId, path: &str) -> bool {
		self.router == router && self.path == path
	}
}

/// Removes the entry with `path` owned by `router`. Returns whether one was found.
pub(crate) fn remove_entry(stack: &mut Vec<RouteEntry>, router: RouterId, path: &str) -> bool {
	match stack.iter().rposition(|entry| entry.is(router, path)) {
		Some(index) => {
			stack.remove(index);
			true
		}
		None => false,
	}
}

/// Returns the topmost path of a stack.
pub(crate) fn top_path(stack: &[RouteEntry]) -> Option<&str> {
	stack.last().map(RouteEntry::path)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn entry(router: u64, path: &str) -> RouteEntry {
		RouteEntry::new(RouterId::from_raw(router), path, None)
	}

	#[rstest]
	fn test_remove_entry_matches_router_and_path() {
		let mut stack = vec![entry(0, "/a"), entry(1, "/a"), entry(0, "/b")];

		assert!(remove_entry(&mut stack, RouterId::from_raw(1), "/a"));
		assert!(!remove_entry(&mut stack, RouterId::from_raw(1), "/a"));

		let remaining: Vec<_> = stack.iter().map(|e| (e.router(), e.path())).collect();
		assert_eq!(
			remaining,
			vec![
				(RouterId::from_raw(0), "/a"),
				(RouterId::from_raw(0), "/b")
			]
		);
	}

	#[rstest]
	fn test_top_path() {
		assert_eq!(top_path(&[]), None);
		assert_eq!(top_path(&[entry(0, "/a"), entry(0, "/b")]), Some("/b"));
	}
}
