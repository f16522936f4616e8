//! Navigation stack engine.
//!
//! Every router keeps its own stack; the root additionally mirrors every
//! entry of every router in call order. Local and mirrored mutations always
//! happen within the same synchronous operation, and each public operation
//! sends at most one stack-changed notification.
//!
//! # Example
//!
//! ```
//! use reinhardt_navigator::{RouteContext, RouteRegistry, RouterTree};
//!
//! let mut tree = RouterTree::new(
//!     RouteRegistry::new()
//!         .route("/movies", |_: &RouteContext| "list")
//!         .route("/movies/:id", |_: &RouteContext| "detail"),
//! );
//!
//! let mut root = tree.router(tree.root()).unwrap();
//! root.push("/movies", None);
//! root.push("/movies/42", None);
//! root.pop();
//!
//! assert!(root.has_route("/movies"));
//! assert!(!root.has_route("/movies/42"));
//! ```

use std::sync::Arc;

use crate::NavigatorResult;
use crate::argument::RouteArgument;
use crate::error::NavigatorError;
use crate::event::{NavigationEvent, PathChanged, StackChanged};
use crate::projection::{ProjectionPass, RenderEntry, build_projection};
use crate::signal::ReceiverId;
use crate::stack::{RouteEntry, remove_entry, top_path};
use crate::tree::{RouterId, RouterTree};

/// Result of a navigation operation.
///
/// Composite operations (`replace`, `pop_until_and_push`) report the push
/// part when it is dropped, even though their removal part took effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The stack changed; `top` is the new topmost path.
	Changed {
		/// Topmost path after the operation.
		top: Option<String>,
	},
	/// The push matched no route and was dropped.
	NotFound {
		/// The unmatched path (after any redirects).
		path: String,
	},
	/// The push was dropped because its redirect chain hit the hop limit.
	RedirectLimitExceeded {
		/// The path whose redirect was refused.
		path: String,
	},
	/// Nothing to do.
	Unchanged,
}

impl NavigationOutcome {
	/// Returns whether the stack changed.
	pub fn is_changed(&self) -> bool {
		matches!(self, Self::Changed { .. })
	}
}

impl<V: 'static> RouterTree<V> {
	/// Returns a navigation handle for a mounted router.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::UnknownRouter`] if `id` is not mounted.
	pub fn router(&mut self, id: RouterId) -> NavigatorResult<Navigator<'_, V>> {
		if !self.contains(id) {
			return Err(NavigatorError::UnknownRouter(id));
		}
		Ok(Navigator { tree: self, id })
	}

	pub(crate) fn top(&self, id: RouterId) -> Option<String> {
		self.node(id)
			.and_then(|node| top_path(&node.stack))
			.map(str::to_string)
	}

	pub(crate) fn has_route_in(&self, id: RouterId, path: &str) -> bool {
		self.node(id)
			.is_some_and(|node| node.stack.iter().any(|entry| entry.path() == path))
	}

	pub(crate) fn push_route(
		&mut self,
		id: RouterId,
		path: &str,
		argument: Option<RouteArgument>,
	) -> NavigationOutcome {
		let before = self.top(id);
		self.push_inner(id, path, argument, 0, before).0
	}

	pub(crate) fn replace_route(
		&mut self,
		id: RouterId,
		path: &str,
		argument: Option<RouteArgument>,
	) -> NavigationOutcome {
		let before = self.top(id);
		let removed = self.remove_top(id);
		let (outcome, settled) = self.push_inner(id, path, argument, 0, before.clone());
		if removed && !settled {
			self.settle(id, before, ProjectionPass::Settled);
		}
		outcome
	}

	pub(crate) fn pop_route(&mut self, id: RouterId) -> NavigationOutcome {
		let before = self.top(id);
		if !self.remove_top(id) {
			return NavigationOutcome::Unchanged;
		}
		self.settle(id, before, ProjectionPass::Settled);
		NavigationOutcome::Changed { top: self.top(id) }
	}

	pub(crate) fn pop_until_route(&mut self, id: RouterId, path: &str) -> NavigationOutcome {
		let before = self.top(id);
		let removed = self.pop_while_top_is_not(id, path);
		self.settle(id, before, ProjectionPass::Settled);
		if removed == 0 {
			NavigationOutcome::Unchanged
		} else {
			NavigationOutcome::Changed { top: self.top(id) }
		}
	}

	pub(crate) fn pop_until_and_push_route(
		&mut self,
		id: RouterId,
		replace_path: &str,
		new_path: &str,
		argument: Option<RouteArgument>,
	) -> NavigationOutcome {
		let before = self.top(id);
		self.pop_while_top_is_not(id, replace_path);
		let (outcome, settled) = self.push_inner(id, new_path, argument, 0, before.clone());
		if !settled {
			self.settle(id, before, ProjectionPass::Settled);
		}
		outcome
	}

	/// Resolves redirects and appends the entry.
	///
	/// Returns the outcome and whether this call already settled (rebuilt
	/// and notified) the router.
	fn push_inner(
		&mut self,
		id: RouterId,
		path: &str,
		argument: Option<RouteArgument>,
		hops: usize,
		before: Option<String>,
	) -> (NavigationOutcome, bool) {
		let Some(registry) = self.node(id).map(|node| Arc::clone(node.registry())) else {
			return (NavigationOutcome::Unchanged, false);
		};

		let redirect = registry
			.redirect_for(path)
			.filter(|target| target.as_str() != path);
		let (result, pass) = match redirect {
			Some(target) => {
				if hops >= self.settings().max_redirect_hops {
					tracing::warn!(router = %id, path, hops, "redirect limit exceeded, push dropped");
					self.events.send(&NavigationEvent::RedirectLimitExceeded {
						router: id,
						path: path.to_string(),
						hops,
					});
					return (
						NavigationOutcome::RedirectLimitExceeded {
							path: path.to_string(),
						},
						false,
					);
				}

				tracing::debug!(router = %id, path, target = %target, "redirecting push");
				self.events.send(&NavigationEvent::Redirected {
					router: id,
					from: path.to_string(),
					to: target.clone(),
				});
				// The redirected frame rebuilds and notifies; this frame must not.
				let result = self.push_inner(id, &target, argument, hops + 1, before.clone());
				(result, ProjectionPass::RedirectInFlight)
			}
			None => {
				if registry.lookup(path).is_none() {
					tracing::warn!(router = %id, path, "no route matches, push dropped");
					self.events.send(&NavigationEvent::RouteNotFound {
						router: id,
						path: path.to_string(),
					});
					return (
						NavigationOutcome::NotFound {
							path: path.to_string(),
						},
						false,
					);
				}

				let entry = RouteEntry::new(id, path, argument);
				if let Some(node) = self.node_mut(id) {
					remove_entry(&mut node.stack, id, path);
					node.stack.push(entry.clone());
				}
				remove_entry(&mut self.mirrored, id, path);
				self.mirrored.push(entry);
				tracing::debug!(router = %id, path, "route pushed");
				self.events.send(&NavigationEvent::Pushed {
					router: id,
					path: path.to_string(),
				});

				let outcome = NavigationOutcome::Changed {
					top: Some(path.to_string()),
				};
				((outcome, true), ProjectionPass::Settled)
			}
		};

		self.settle(id, before, pass);
		result
	}

	/// Removes the top entry from the local and mirrored stacks.
	fn remove_top(&mut self, id: RouterId) -> bool {
		let Some(entry) = self.node_mut(id).and_then(|node| node.stack.pop()) else {
			return false;
		};
		remove_entry(&mut self.mirrored, id, entry.path());
		tracing::debug!(router = %id, path = entry.path(), "route removed");
		true
	}

	fn pop_while_top_is_not(&mut self, id: RouterId, path: &str) -> usize {
		let mut removed = 0;
		loop {
			match self.node(id).and_then(|node| top_path(&node.stack)) {
				Some(top) if top != path => {}
				_ => break,
			}
			self.remove_top(id);
			removed += 1;
		}
		removed
	}

	/// Rebuilds the projection and sends the notifications of a finished
	/// operation.
	fn settle(&mut self, id: RouterId, before: Option<String>, pass: ProjectionPass) {
		let Some(node) = self.node_mut(id) else {
			return;
		};
		let Some(projection) = build_projection(id, node.registry(), &node.stack, pass) else {
			tracing::trace!(router = %id, "projection skipped, redirect in flight");
			return;
		};
		node.projection = projection;

		let changed = StackChanged {
			router: id,
			entries: node.stack.clone(),
		};
		node.stack_changed.send(&changed);

		let after = top_path(&node.stack).map(str::to_string);
		if after == before {
			return;
		}
		let event = PathChanged {
			router: id,
			router_name: node.name().to_string(),
			path: after,
		};
		if self.settings().defer_path_notifications {
			self.tasks
				.schedule(move |tree: &mut RouterTree<V>| tree.path_changed.send(&event));
		} else {
			self.path_changed.send(&event);
		}
	}
}

/// Navigation API of one router.
///
/// Obtained from [`RouterTree::router`]; holds the tree exclusively for as
/// long as it lives.
pub struct Navigator<'a, V> {
	tree: &'a mut RouterTree<V>,
	id: RouterId,
}

impl<V> std::fmt::Debug for Navigator<'_, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator").field("id", &self.id).finish()
	}
}

impl<'a, V: 'static> Navigator<'a, V> {
	/// Returns the router id.
	pub fn id(&self) -> RouterId {
		self.id
	}

	/// Returns the router name.
	pub fn name(&self) -> &str {
		self.tree.node(self.id).map_or("", |node| node.name())
	}

	/// Pushes `path`, following redirects. Re-pushing a stacked path moves
	/// it to the top.
	pub fn push(&mut self, path: &str, argument: Option<RouteArgument>) -> NavigationOutcome {
		self.tree.push_route(self.id, path, argument)
	}

	/// Replaces the top entry with `path`.
	pub fn replace(&mut self, path: &str, argument: Option<RouteArgument>) -> NavigationOutcome {
		self.tree.replace_route(self.id, path, argument)
	}

	/// Pops the top entry. No-op on an empty stack.
	pub fn pop(&mut self) -> NavigationOutcome {
		self.tree.pop_route(self.id)
	}

	/// Pops until `path` is on top or the stack is empty.
	pub fn pop_until(&mut self, path: &str) -> NavigationOutcome {
		self.tree.pop_until_route(self.id, path)
	}

	/// Pops until `replace_path` is on top (or the stack is empty), then
	/// pushes `new_path`.
	pub fn pop_until_and_push(
		&mut self,
		replace_path: &str,
		new_path: &str,
		argument: Option<RouteArgument>,
	) -> NavigationOutcome {
		self.tree
			.pop_until_and_push_route(self.id, replace_path, new_path, argument)
	}

	/// Checks whether an entry with exactly `path` is stacked.
	pub fn has_route(&self, path: &str) -> bool {
		self.tree.has_route_in(self.id, path)
	}

	/// Handles a pop gesture reported by the host. Returns whether an entry
	/// was popped.
	pub fn handle_host_pop(&mut self) -> bool {
		self.pop().is_changed()
	}

	/// Returns the handle of a direct child router.
	pub fn sub_router(self, name: &str) -> Option<Navigator<'a, V>> {
		let id = self.tree.find_child_by_name(self.id, name)?;
		Some(Navigator {
			tree: self.tree,
			id,
		})
	}

	/// Returns the local stack, bottom first.
	pub fn stack(&self) -> &[RouteEntry] {
		self.tree
			.node(self.id)
			.map(|node| node.stack())
			.unwrap_or_default()
	}

	/// Returns the renderable entries of the stack, bottom first.
	pub fn projection(&self) -> &[RenderEntry<V>] {
		self.tree
			.node(self.id)
			.map(|node| node.projection())
			.unwrap_or_default()
	}

	/// Generates a path for a route declared by name in this router.
	///
	/// # Errors
	///
	/// See [`RouteRegistry::reverse`](crate::RouteRegistry::reverse).
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> NavigatorResult<String> {
		let node = self
			.tree
			.node(self.id)
			.ok_or(NavigatorError::UnknownRouter(self.id))?;
		node.registry().reverse(name, params)
	}

	/// Connects a receiver for this router's stack changes.
	///
	/// Returns `None` only if the router is no longer mounted.
	pub fn on_stack_changed<F>(&mut self, receiver: F) -> Option<ReceiverId>
	where
		F: FnMut(&StackChanged) + 'static,
	{
		self.tree
			.node_mut(self.id)
			.map(|node| node.stack_changed.connect(receiver))
	}

	/// Disconnects a stack-changed receiver.
	pub fn disconnect_stack_changed(&mut self, id: ReceiverId) -> bool {
		self.tree
			.node_mut(self.id)
			.is_some_and(|node| node.stack_changed.disconnect(id))
	}
}
