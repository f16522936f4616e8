//! The router tree.
//!
//! All router nodes live in an arena owned by [`RouterTree`]. A node refers
//! to its parent by [`RouterId`] only, resolved through the arena at use
//! time, and owns its children through a name-keyed map. Unmounting a node
//! drops its whole subtree.
//!
//! The tree also owns the state shared by every router: the mirrored global
//! stack, the deferred task queue and the tree-wide signals.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::NavigatorResult;
use crate::error::NavigatorError;
use crate::event::{NavigationEvent, PathChanged, StackChanged};
use crate::projection::RenderEntry;
use crate::registry::RouteRegistry;
use crate::scheduler::TaskQueue;
use crate::settings::NavigatorSettings;
use crate::signal::{ReceiverId, Signal};
use crate::stack::RouteEntry;

/// Identity of a router node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouterId(u64);

impl RouterId {
	/// The root router of every tree.
	pub const ROOT: RouterId = RouterId(0);

	#[cfg(test)]
	pub(crate) const fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw numeric id.
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for RouterId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "router#{}", self.0)
	}
}

/// One navigation scope.
pub struct RouterNode<V> {
	id: RouterId,
	name: String,
	parent: Option<RouterId>,
	children: IndexMap<String, RouterId>,
	registry: Arc<RouteRegistry<V>>,
	pub(crate) stack: Vec<RouteEntry>,
	pub(crate) projection: Vec<RenderEntry<V>>,
	pub(crate) stack_changed: Signal<StackChanged>,
}

impl<V> std::fmt::Debug for RouterNode<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterNode")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("parent", &self.parent)
			.field("children", &self.children)
			.field("stack", &self.stack)
			.finish()
	}
}

impl<V> RouterNode<V> {
	fn new(
		id: RouterId,
		name: String,
		parent: Option<RouterId>,
		registry: Arc<RouteRegistry<V>>,
	) -> Self {
		Self {
			id,
			name,
			parent,
			children: IndexMap::new(),
			registry,
			stack: Vec::new(),
			projection: Vec::new(),
			stack_changed: Signal::new(),
		}
	}

	/// Returns the node id.
	pub fn id(&self) -> RouterId {
		self.id
	}

	/// Returns the node name (empty for an unnamed root).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the parent id; `None` for the root.
	pub fn parent(&self) -> Option<RouterId> {
		self.parent
	}

	/// Returns the direct children in registration order.
	pub fn children(&self) -> impl Iterator<Item = (&str, RouterId)> {
		self.children
			.iter()
			.map(|(name, id)| (name.as_str(), *id))
	}

	/// Returns the route registry.
	pub fn registry(&self) -> &Arc<RouteRegistry<V>> {
		&self.registry
	}

	/// Returns the local stack, bottom first.
	pub fn stack(&self) -> &[RouteEntry] {
		&self.stack
	}

	/// Returns the current render projection.
	pub fn projection(&self) -> &[RenderEntry<V>] {
		&self.projection
	}
}

/// The runtime tree of routers.
pub struct RouterTree<V> {
	nodes: HashMap<RouterId, RouterNode<V>>,
	next_id: u64,
	pub(crate) mirrored: Vec<RouteEntry>,
	settings: NavigatorSettings,
	pub(crate) tasks: TaskQueue<RouterTree<V>>,
	pub(crate) path_changed: Signal<PathChanged>,
	pub(crate) events: Signal<NavigationEvent>,
}

impl<V> std::fmt::Debug for RouterTree<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterTree")
			.field("routers", &self.nodes.len())
			.field("mirrored", &self.mirrored)
			.field("settings", &self.settings)
			.field("tasks", &self.tasks)
			.finish()
	}
}

impl<V: 'static> RouterTree<V> {
	/// Creates a tree whose root uses `registry`, with default settings.
	pub fn new(registry: RouteRegistry<V>) -> Self {
		Self::with_settings(registry, NavigatorSettings::default())
	}

	/// Creates a tree with explicit settings.
	///
	/// If the registry declares an initial path, its push is deferred until
	/// the first [`flush`](Self::flush).
	pub fn with_settings(registry: RouteRegistry<V>, settings: NavigatorSettings) -> Self {
		let root = RouterNode::new(
			RouterId::ROOT,
			settings.root_name.clone(),
			None,
			Arc::new(registry),
		);
		let mut tree = Self {
			nodes: HashMap::from([(RouterId::ROOT, root)]),
			next_id: 1,
			mirrored: Vec::new(),
			settings,
			tasks: TaskQueue::new(),
			path_changed: Signal::new(),
			events: Signal::new(),
		};
		tree.schedule_initial_push(RouterId::ROOT);
		tree
	}

	/// Returns the root router id.
	pub fn root(&self) -> RouterId {
		RouterId::ROOT
	}

	/// Returns the tree settings.
	pub fn settings(&self) -> &NavigatorSettings {
		&self.settings
	}

	/// Returns a router node.
	pub fn node(&self, id: RouterId) -> Option<&RouterNode<V>> {
		self.nodes.get(&id)
	}

	pub(crate) fn node_mut(&mut self, id: RouterId) -> Option<&mut RouterNode<V>> {
		self.nodes.get_mut(&id)
	}

	/// Returns whether `id` is mounted.
	pub fn contains(&self, id: RouterId) -> bool {
		self.nodes.contains_key(&id)
	}

	/// Returns the number of mounted routers, root included.
	pub fn router_count(&self) -> usize {
		self.nodes.len()
	}

	/// Mounts a new child router under `parent`.
	///
	/// The child's initial path, if declared, is pushed on the next flush.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::UnknownRouter`] if `parent` is not mounted
	/// and [`NavigatorError::DuplicateRouter`] if a sibling has the same name.
	pub fn mount(
		&mut self,
		parent: RouterId,
		name: impl Into<String>,
		registry: RouteRegistry<V>,
	) -> NavigatorResult<RouterId> {
		let name = name.into();
		let parent_node = self
			.nodes
			.get(&parent)
			.ok_or(NavigatorError::UnknownRouter(parent))?;
		if parent_node.children.contains_key(&name) {
			return Err(NavigatorError::DuplicateRouter { parent, name });
		}

		let id = RouterId(self.next_id);
		self.next_id += 1;
		self.nodes.insert(
			id,
			RouterNode::new(id, name.clone(), Some(parent), Arc::new(registry)),
		);
		self.register_child(parent, name.clone(), id);
		tracing::debug!(router = %id, %parent, name = %name, "router mounted");

		self.schedule_initial_push(id);
		Ok(id)
	}

	/// Unmounts a router and drops its subtree.
	///
	/// Entries owned by the dropped routers are purged from the mirrored
	/// stack. Returns `Ok(false)` if `id` is not mounted.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::RootRouter`] for the root.
	pub fn unmount(&mut self, id: RouterId) -> NavigatorResult<bool> {
		if id == RouterId::ROOT {
			return Err(NavigatorError::RootRouter);
		}
		let Some(node) = self.nodes.get(&id) else {
			return Ok(false);
		};
		let name = node.name.clone();
		if let Some(parent) = node.parent {
			self.unregister_child(parent, &name);
		}

		let dropped = self.subtree(id);
		for router in &dropped {
			self.nodes.remove(router);
		}
		self.mirrored
			.retain(|entry| !dropped.contains(&entry.router()));
		tracing::debug!(router = %id, name = %name, dropped = dropped.len(), "router unmounted");
		Ok(true)
	}

	fn register_child(&mut self, parent: RouterId, name: String, child: RouterId) {
		if let Some(node) = self.nodes.get_mut(&parent) {
			node.children.insert(name, child);
		}
	}

	fn unregister_child(&mut self, parent: RouterId, name: &str) {
		if let Some(node) = self.nodes.get_mut(&parent) {
			node.children.shift_remove(name);
		}
	}

	/// Returns `id` and all its descendants in depth-first pre-order.
	fn subtree(&self, id: RouterId) -> Vec<RouterId> {
		let mut visited = Vec::new();
		let mut pending = vec![id];
		while let Some(current) = pending.pop() {
			let Some(node) = self.nodes.get(&current) else {
				continue;
			};
			visited.push(current);
			pending.extend(node.children.values().rev().copied());
		}
		visited
	}

	/// Finds a direct child by name.
	pub fn find_child_by_name(&self, id: RouterId, name: &str) -> Option<RouterId> {
		self.nodes.get(&id)?.children.get(name).copied()
	}

	/// Finds the first router named `name` in the subtree rooted at `id`,
	/// searching depth-first in pre-order with children in registration
	/// order. The subtree root itself is visited first.
	pub fn find_descendant_by_name(&self, id: RouterId, name: &str) -> Option<RouterId> {
		self.subtree(id)
			.into_iter()
			.find(|router| self.nodes.get(router).is_some_and(|n| n.name == name))
	}

	/// Returns the mirrored global stack, oldest first.
	pub fn mirrored_stack(&self) -> &[RouteEntry] {
		&self.mirrored
	}

	/// Runs deferred tasks until the queue is empty and returns how many ran.
	pub fn flush(&mut self) -> usize {
		let mut ran = 0;
		while let Some(task) = self.tasks.pop() {
			task(self);
			ran += 1;
		}
		ran
	}

	/// Returns the number of deferred tasks waiting for [`flush`](Self::flush).
	pub fn pending_tasks(&self) -> usize {
		self.tasks.len()
	}

	/// Connects a receiver for top-path changes in any router.
	pub fn on_path_changed<F>(&mut self, receiver: F) -> ReceiverId
	where
		F: FnMut(&PathChanged) + 'static,
	{
		self.path_changed.connect(receiver)
	}

	/// Disconnects a path-changed receiver.
	pub fn disconnect_path_changed(&mut self, id: ReceiverId) -> bool {
		self.path_changed.disconnect(id)
	}

	/// Connects a receiver for navigation events.
	pub fn on_navigation_event<F>(&mut self, receiver: F) -> ReceiverId
	where
		F: FnMut(&NavigationEvent) + 'static,
	{
		self.events.connect(receiver)
	}

	/// Disconnects a navigation event receiver.
	pub fn disconnect_navigation_event(&mut self, id: ReceiverId) -> bool {
		self.events.disconnect(id)
	}

	fn schedule_initial_push(&mut self, id: RouterId) {
		let Some(path) = self
			.nodes
			.get(&id)
			.and_then(|node| node.registry.initial())
			.map(str::to_string)
		else {
			return;
		};
		self.tasks.schedule(move |tree: &mut RouterTree<V>| {
			if let Ok(mut router) = tree.router(id) {
				router.push(&path, None);
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use rstest::{fixture, rstest};

	use super::*;
	use crate::route::RouteContext;

	fn registry() -> RouteRegistry<()> {
		RouteRegistry::new().route("/", |_: &RouteContext| ())
	}

	#[fixture]
	fn tree() -> RouterTree<()> {
		RouterTree::new(registry())
	}

	#[rstest]
	fn test_root_node(tree: RouterTree<()>) {
		let root = tree.node(tree.root()).unwrap();
		assert_eq!(root.name(), "");
		assert!(root.parent().is_none());
		assert_eq!(tree.router_count(), 1);
	}

	#[rstest]
	fn test_mount_registers_child(mut tree: RouterTree<()>) {
		let child = tree.mount(tree.root(), "detail", registry()).unwrap();

		assert_eq!(tree.find_child_by_name(tree.root(), "detail"), Some(child));
		assert_eq!(tree.node(child).unwrap().parent(), Some(RouterId::ROOT));
	}

	#[rstest]
	fn test_mount_rejects_duplicate_sibling(mut tree: RouterTree<()>) {
		tree.mount(tree.root(), "detail", registry()).unwrap();
		let result = tree.mount(tree.root(), "detail", registry());
		assert!(matches!(result, Err(NavigatorError::DuplicateRouter { .. })));
	}

	#[rstest]
	fn test_mount_under_unknown_parent(mut tree: RouterTree<()>) {
		let result = tree.mount(RouterId::from_raw(99), "x", registry());
		assert!(matches!(result, Err(NavigatorError::UnknownRouter(_))));
	}

	#[rstest]
	fn test_find_child_is_direct_only(mut tree: RouterTree<()>) {
		let list = tree.mount(tree.root(), "list", registry()).unwrap();
		tree.mount(list, "detail", registry()).unwrap();

		assert!(tree.find_child_by_name(tree.root(), "detail").is_none());
	}

	#[rstest]
	fn test_find_descendant_pre_order(mut tree: RouterTree<()>) {
		// root
		// ├── a
		// │   └── shared (deep)
		// └── shared (shallow)
		let a = tree.mount(tree.root(), "a", registry()).unwrap();
		let deep = tree.mount(a, "shared", registry()).unwrap();
		let shallow = tree.mount(tree.root(), "shared", registry()).unwrap();

		assert_eq!(tree.find_descendant_by_name(tree.root(), "shared"), Some(deep));
		assert_eq!(tree.find_descendant_by_name(a, "a"), Some(a));
		assert_ne!(deep, shallow);
		assert!(tree.find_descendant_by_name(tree.root(), "missing").is_none());
	}

	#[rstest]
	fn test_unmount_drops_subtree(mut tree: RouterTree<()>) {
		let list = tree.mount(tree.root(), "list", registry()).unwrap();
		let detail = tree.mount(list, "detail", registry()).unwrap();

		assert!(tree.unmount(list).unwrap());

		assert!(!tree.contains(list));
		assert!(!tree.contains(detail));
		assert!(tree.find_child_by_name(tree.root(), "list").is_none());
		assert_eq!(tree.router_count(), 1);
	}

	#[rstest]
	fn test_unmount_is_idempotent(mut tree: RouterTree<()>) {
		let list = tree.mount(tree.root(), "list", registry()).unwrap();
		assert!(tree.unmount(list).unwrap());
		assert!(!tree.unmount(list).unwrap());
	}

	#[rstest]
	fn test_unmount_root_rejected(mut tree: RouterTree<()>) {
		assert!(matches!(
			tree.unmount(RouterId::ROOT),
			Err(NavigatorError::RootRouter)
		));
	}

	#[rstest]
	fn test_name_can_be_reused_after_unmount(mut tree: RouterTree<()>) {
		let first = tree.mount(tree.root(), "detail", registry()).unwrap();
		tree.unmount(first).unwrap();
		let second = tree.mount(tree.root(), "detail", registry()).unwrap();
		assert_ne!(first, second);
	}
}
