//! Notification payloads.

use crate::stack::RouteEntry;
use crate::tree::RouterId;

/// A router's stack changed; sent once per completed mutation.
#[derive(Debug, Clone)]
pub struct StackChanged {
	/// Router whose stack changed.
	pub router: RouterId,
	/// The router's stack after the mutation, bottom first.
	pub entries: Vec<RouteEntry>,
}

/// The topmost entry of some router changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChanged {
	/// Router whose top changed.
	pub router: RouterId,
	/// Name of that router (empty for the root).
	pub router_name: String,
	/// New topmost path, `None` when the stack became empty.
	pub path: Option<String>,
}

/// Navigation outcomes worth observing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
	/// An entry was pushed.
	Pushed {
		/// Router that received the entry.
		router: RouterId,
		/// Pushed path.
		path: String,
	},
	/// A push was substituted by a redirect hook.
	Redirected {
		/// Router the push was addressed to.
		router: RouterId,
		/// Requested path.
		from: String,
		/// Substitute path.
		to: String,
	},
	/// A push matched no route and was dropped.
	RouteNotFound {
		/// Router the push was addressed to.
		router: RouterId,
		/// Unmatched path.
		path: String,
	},
	/// A redirect chain was cut off by the hop guard.
	RedirectLimitExceeded {
		/// Router the push was addressed to.
		router: RouterId,
		/// Path whose redirect would have exceeded the limit.
		path: String,
		/// Hops already taken.
		hops: usize,
	},
	/// A history record was applied.
	Restored {
		/// Router the record resolved to.
		router: RouterId,
		/// Restored path.
		path: String,
		/// Whether the path was already stacked and was popped back to.
		in_place: bool,
	},
}
