//! Bridge between the router tree and host history.
//!
//! The most recent mirrored entry is saved as a [`HistoryRecord`]:
//!
//! ```json
//! { "path": "/movies/42", "state": { "data": { ... }, "meta": { "routerName": "detail" } } }
//! ```
//!
//! `data` is present only when the route declares a codec able to encode the
//! entry's argument. Restoring a record resolves the router by name anywhere
//! in the tree (falling back to the root) and then either pops back to the
//! path, if that router already stacks it, or pushes it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::argument::RouteArgument;
use crate::error::NavigatorError;
use crate::event::NavigationEvent;
use crate::navigation::NavigationOutcome;
use crate::stack::RouteEntry;
use crate::tree::{RouterId, RouterTree};

/// In-memory "where are we": a path, its argument and the owning router.
#[derive(Debug, Clone)]
pub struct NavigationConfiguration {
	/// Concrete path.
	pub path: String,
	/// Argument of the entry.
	pub argument: Option<RouteArgument>,
	/// Router that owns the entry.
	pub router: RouterId,
	/// Name of that router.
	pub router_name: String,
}

/// Serialized history state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
	/// Concrete path.
	pub path: String,
	/// Attached state.
	pub state: HistoryState,
}

/// `state` part of a [`HistoryRecord`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryState {
	/// Codec-encoded argument.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	/// Routing metadata.
	#[serde(default)]
	pub meta: HistoryMeta,
}

/// `state.meta` part of a [`HistoryRecord`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryMeta {
	/// Name of the owning router; empty restores into the root.
	#[serde(rename = "routerName", default)]
	pub router_name: String,
}

impl HistoryRecord {
	/// A bare deep link: no argument, restored into the root.
	pub fn from_path(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			state: HistoryState::default(),
		}
	}

	/// Serializes the record to a JSON value.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::Serialization`] if encoding fails.
	pub fn to_json(&self) -> Result<Value, NavigatorError> {
		Ok(serde_json::to_value(self)?)
	}

	/// Parses a record from a JSON value.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::Serialization`] if the value has the wrong
	/// shape.
	pub fn from_json(value: Value) -> Result<Self, NavigatorError> {
		Ok(serde_json::from_value(value)?)
	}
}

/// A history record resolved against the live tree.
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
	/// Router the record restores into.
	pub router: RouterId,
	/// Concrete path.
	pub path: String,
	/// Decoded argument.
	pub argument: Option<RouteArgument>,
}

impl<V: 'static> RouterTree<V> {
	/// Captures an entry as a configuration.
	pub fn to_configuration(&self, entry: &RouteEntry) -> NavigationConfiguration {
		NavigationConfiguration {
			path: entry.path().to_string(),
			argument: entry.argument().cloned(),
			router: entry.router(),
			router_name: self
				.node(entry.router())
				.map(|node| node.name().to_string())
				.unwrap_or_default(),
		}
	}

	/// Captures the most recent mirrored entry.
	pub fn current_configuration(&self) -> Option<NavigationConfiguration> {
		self.mirrored_stack()
			.last()
			.map(|entry| self.to_configuration(entry))
	}

	/// Encodes a configuration as a history record.
	///
	/// The argument is encoded through the codec of the route matching the
	/// path in the owning router; without one, `data` stays absent.
	pub fn encode_configuration(&self, config: &NavigationConfiguration) -> HistoryRecord {
		let data = config.argument.as_ref().and_then(|argument| {
			self.node(config.router)?
				.registry()
				.lookup(&config.path)?
				.codec()?
				.encode(argument)
		});
		HistoryRecord {
			path: config.path.clone(),
			state: HistoryState {
				data,
				meta: HistoryMeta {
					router_name: config.router_name.clone(),
				},
			},
		}
	}

	/// Saves the current configuration, if any entry is stacked.
	pub fn save_configuration(&self) -> Option<HistoryRecord> {
		self.current_configuration()
			.map(|config| self.encode_configuration(&config))
	}

	/// Resolves a record against the tree.
	///
	/// An empty or unknown router name resolves to the root. The argument is
	/// decoded only when the record carries data and the matching route has
	/// a codec; a decode failure degrades to no argument.
	pub fn from_configuration(&self, record: &HistoryRecord) -> ResolvedConfiguration {
		let router = self.resolve_router(&record.state.meta.router_name);
		let codec = self
			.node(router)
			.and_then(|node| node.registry().lookup(&record.path))
			.and_then(|declaration| declaration.codec());
		let argument = match (&record.state.data, codec) {
			(Some(data), Some(codec)) => match codec.decode(data.clone()) {
				Ok(argument) => Some(argument),
				Err(error) => {
					tracing::warn!(router = %router, path = %record.path, %error, "history argument dropped");
					None
				}
			},
			_ => None,
		};
		ResolvedConfiguration {
			router,
			path: record.path.clone(),
			argument,
		}
	}

	/// Restores a history record.
	///
	/// If the resolved router already stacks the path, it pops back to it;
	/// otherwise the path is pushed.
	pub fn restore(&mut self, record: &HistoryRecord) -> NavigationOutcome {
		let resolved = self.from_configuration(record);
		let router = resolved.router;
		let in_place = self.has_route_in(router, &resolved.path);
		tracing::debug!(router = %router, path = %resolved.path, in_place, "restoring history");

		let outcome = if in_place {
			self.pop_until_route(router, &resolved.path)
		} else {
			self.push_route(router, &resolved.path, resolved.argument)
		};
		self.events.send(&NavigationEvent::Restored {
			router,
			path: resolved.path,
			in_place,
		});
		outcome
	}

	fn resolve_router(&self, name: &str) -> RouterId {
		if name.is_empty() {
			return self.root();
		}
		self.find_descendant_by_name(self.root(), name)
			.unwrap_or_else(|| self.root())
	}
}

#[cfg(test)]
mod tests {
	use assert_json_diff::assert_json_eq;
	use rstest::{fixture, rstest};
	use serde_json::json;

	use super::*;
	use crate::argument::ArgumentCodec;
	use crate::registry::RouteRegistry;
	use crate::route::{RouteContext, RouteDeclaration};

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Movie {
		title: String,
	}

	fn page(ctx: &RouteContext) -> String {
		ctx.path.clone()
	}

	#[fixture]
	fn tree() -> RouterTree<String> {
		let mut tree = RouterTree::new(RouteRegistry::new().route("/", page));
		tree.mount(
			RouterId::ROOT,
			"detail",
			RouteRegistry::new()
				.declare(
					RouteDeclaration::new("/movies/:id", page).with_codec(ArgumentCodec::json::<Movie>()),
				)
				.route("/plain", page),
		)
		.unwrap();
		tree
	}

	fn detail(tree: &RouterTree<String>) -> RouterId {
		tree.find_child_by_name(RouterId::ROOT, "detail").unwrap()
	}

	#[rstest]
	fn test_record_json_shape() {
		let record = HistoryRecord {
			path: "/movies/1".to_string(),
			state: HistoryState {
				data: Some(json!({"title": "Alien"})),
				meta: HistoryMeta {
					router_name: "detail".to_string(),
				},
			},
		};

		assert_json_eq!(
			record.to_json().unwrap(),
			json!({
				"path": "/movies/1",
				"state": {"data": {"title": "Alien"}, "meta": {"routerName": "detail"}}
			})
		);
	}

	#[rstest]
	fn test_record_without_data_omits_key() {
		assert_json_eq!(
			HistoryRecord::from_path("/").to_json().unwrap(),
			json!({"path": "/", "state": {"meta": {"routerName": ""}}})
		);
	}

	#[rstest]
	fn test_record_from_json_tolerates_missing_state_fields() {
		let record = HistoryRecord::from_json(json!({"path": "/a", "state": {}})).unwrap();
		assert_eq!(record, HistoryRecord::from_path("/a"));
	}

	#[rstest]
	fn test_record_from_json_rejects_bad_shape() {
		let result = HistoryRecord::from_json(json!({"state": {}}));
		assert!(matches!(result, Err(NavigatorError::Serialization(_))));
	}

	#[rstest]
	fn test_save_encodes_argument(mut tree: RouterTree<String>) {
		let id = detail(&tree);
		let movie = Movie {
			title: "Alien".to_string(),
		};
		tree.router(id)
			.unwrap()
			.push("/movies/1", Some(RouteArgument::new(movie)));

		let record = tree.save_configuration().unwrap();

		assert_eq!(record.path, "/movies/1");
		assert_eq!(record.state.meta.router_name, "detail");
		assert_eq!(record.state.data, Some(json!({"title": "Alien"})));
	}

	#[rstest]
	fn test_save_without_codec_has_no_data(mut tree: RouterTree<String>) {
		let id = detail(&tree);
		tree.router(id)
			.unwrap()
			.push("/plain", Some(RouteArgument::new(7_u32)));

		assert_eq!(tree.save_configuration().unwrap().state.data, None);
	}

	#[rstest]
	fn test_save_uses_owning_router_when_names_repeat() {
		// root
		// ├── a
		// │   └── shared (no codec)
		// └── shared (codec)
		let mut tree = RouterTree::new(RouteRegistry::new().route("/", page));
		let a = tree
			.mount(RouterId::ROOT, "a", RouteRegistry::new())
			.unwrap();
		tree.mount(a, "shared", RouteRegistry::new().route("/other", page))
			.unwrap();
		let shallow = tree
			.mount(
				RouterId::ROOT,
				"shared",
				RouteRegistry::new()
					.declare(RouteDeclaration::new("/m", page).with_codec(ArgumentCodec::json::<u32>())),
			)
			.unwrap();
		tree.router(shallow)
			.unwrap()
			.push("/m", Some(RouteArgument::new(5_u32)));

		let config = tree.current_configuration().unwrap();
		let record = tree.save_configuration().unwrap();

		assert_eq!(config.router, shallow);
		assert_eq!(record.state.meta.router_name, "shared");
		assert_eq!(record.state.data, Some(json!(5)));
	}

	#[rstest]
	fn test_save_on_empty_tree(tree: RouterTree<String>) {
		assert!(tree.save_configuration().is_none());
	}

	#[rstest]
	#[case("")]
	#[case("unknown")]
	fn test_from_configuration_falls_back_to_root(tree: RouterTree<String>, #[case] name: &str) {
		let mut record = HistoryRecord::from_path("/");
		record.state.meta.router_name = name.to_string();
		assert_eq!(tree.from_configuration(&record).router, RouterId::ROOT);
	}

	#[rstest]
	fn test_from_configuration_decodes_argument(tree: RouterTree<String>) {
		let record = HistoryRecord::from_json(json!({
			"path": "/movies/3",
			"state": {"data": {"title": "Heat"}, "meta": {"routerName": "detail"}}
		}))
		.unwrap();

		let resolved = tree.from_configuration(&record);

		assert_eq!(resolved.router, detail(&tree));
		let movie = resolved.argument.unwrap();
		assert_eq!(movie.downcast_ref::<Movie>().unwrap().title, "Heat");
	}

	#[rstest]
	fn test_from_configuration_drops_undecodable_argument(tree: RouterTree<String>) {
		let record = HistoryRecord::from_json(json!({
			"path": "/movies/3",
			"state": {"data": 42, "meta": {"routerName": "detail"}}
		}))
		.unwrap();

		assert!(tree.from_configuration(&record).argument.is_none());
	}

	#[rstest]
	fn test_restore_in_place_pops(mut tree: RouterTree<String>) {
		let id = detail(&tree);
		{
			let mut router = tree.router(id).unwrap();
			router.push("/movies/1", None);
			router.push("/movies/2", None);
		}
		let mut record = HistoryRecord::from_path("/movies/1");
		record.state.meta.router_name = "detail".to_string();

		tree.restore(&record);

		let paths: Vec<_> = tree.node(id).unwrap().stack().iter().map(|e| e.path()).collect();
		assert_eq!(paths, vec!["/movies/1"]);
	}

	#[rstest]
	fn test_restore_deep_link_pushes_into_root(mut tree: RouterTree<String>) {
		let outcome = tree.restore(&HistoryRecord::from_path("/"));

		assert!(outcome.is_changed());
		assert!(tree.router(RouterId::ROOT).unwrap().has_route("/"));
	}
}
