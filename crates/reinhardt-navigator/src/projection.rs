//! Render projection: a router's stack as the host's renderable entries.

use std::sync::Arc;

use crate::argument::RouteArgument;
use crate::params::RouteParams;
use crate::registry::RouteRegistry;
use crate::route::{Renderer, RouteContext};
use crate::stack::RouteEntry;
use crate::tree::RouterId;

/// Which kind of pass a projection rebuild belongs to.
///
/// A push frame that handed off to a redirect rebuilds with
/// [`ProjectionPass::RedirectInFlight`]; the builder returns before looking
/// at the stack so no page is emitted for the abandoned route. The value
/// lives only in that frame, so the next rebuild is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionPass {
	/// The operation completed; build the projection.
	Settled,
	/// A redirect replaced this push; skip the rebuild.
	RedirectInFlight,
}

/// One renderable page, keyed by its concrete path.
pub struct RenderEntry<V> {
	context: RouteContext,
	route_name: Option<String>,
	renderer: Renderer<V>,
}

impl<V> Clone for RenderEntry<V> {
	fn clone(&self) -> Self {
		Self {
			context: self.context.clone(),
			route_name: self.route_name.clone(),
			renderer: Arc::clone(&self.renderer),
		}
	}
}

impl<V> std::fmt::Debug for RenderEntry<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RenderEntry")
			.field("key", &self.key())
			.field("route_name", &self.route_name)
			.field("params", &self.context.params)
			.finish()
	}
}

impl<V> RenderEntry<V> {
	/// Stable identity of the page (its concrete path).
	pub fn key(&self) -> &str {
		&self.context.path
	}

	/// Concrete path.
	pub fn path(&self) -> &str {
		&self.context.path
	}

	/// Argument of the entry.
	pub fn argument(&self) -> Option<&RouteArgument> {
		self.context.argument.as_ref()
	}

	/// Parameters captured from the path.
	pub fn params(&self) -> &RouteParams {
		&self.context.params
	}

	/// Name of the matched route, if declared.
	pub fn route_name(&self) -> Option<&str> {
		self.route_name.as_deref()
	}

	/// Full render context.
	pub fn context(&self) -> &RouteContext {
		&self.context
	}

	/// Invokes the route's renderer.
	pub fn render(&self) -> V {
		(self.renderer)(&self.context)
	}
}

/// Builds the projection of `stack`, bottom first.
///
/// Returns `None` for a [`ProjectionPass::RedirectInFlight`] pass. Entries
/// whose path no longer matches a declaration are skipped.
pub(crate) fn build_projection<V>(
	router: RouterId,
	registry: &RouteRegistry<V>,
	stack: &[RouteEntry],
	pass: ProjectionPass,
) -> Option<Vec<RenderEntry<V>>> {
	if pass == ProjectionPass::RedirectInFlight {
		return None;
	}

	let entries = stack
		.iter()
		.filter_map(|entry| {
			let declaration = registry.lookup(entry.path())?;
			let params = RouteParams::capture(declaration.pattern(), entry.path())?;
			Some(RenderEntry {
				context: RouteContext {
					path: entry.path().to_string(),
					params,
					argument: entry.argument().cloned(),
					router,
				},
				route_name: declaration.name().map(str::to_string),
				renderer: Arc::clone(declaration.renderer()),
			})
		})
		.collect();
	Some(entries)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn registry() -> RouteRegistry<String> {
		RouteRegistry::new()
			.route("/movies", |_: &RouteContext| "list".to_string())
			.named_route("movie", "/movies/:id", |ctx: &RouteContext| {
				format!("movie {}", ctx.params.get("id").unwrap_or_default())
			})
	}

	fn stack(paths: &[&str]) -> Vec<RouteEntry> {
		paths
			.iter()
			.map(|path| RouteEntry::new(RouterId::ROOT, *path, None))
			.collect()
	}

	#[rstest]
	fn test_projection_renders_in_stack_order() {
		let projection = build_projection(
			RouterId::ROOT,
			&registry(),
			&stack(&["/movies", "/movies/42"]),
			ProjectionPass::Settled,
		)
		.unwrap();

		let keys: Vec<_> = projection.iter().map(RenderEntry::key).collect();
		assert_eq!(keys, vec!["/movies", "/movies/42"]);
		assert_eq!(projection[1].render(), "movie 42");
		assert_eq!(projection[1].route_name(), Some("movie"));
		assert_eq!(projection[1].params().get("id"), Some("42"));
	}

	#[rstest]
	fn test_projection_aborts_while_redirect_in_flight() {
		let projection = build_projection(
			RouterId::ROOT,
			&registry(),
			&stack(&["/movies"]),
			ProjectionPass::RedirectInFlight,
		);
		assert!(projection.is_none());
	}

	#[rstest]
	fn test_projection_skips_undeclared_paths() {
		let projection = build_projection(
			RouterId::ROOT,
			&registry(),
			&stack(&["/series", "/movies"]),
			ProjectionPass::Settled,
		)
		.unwrap();
		assert_eq!(projection.len(), 1);
	}
}
