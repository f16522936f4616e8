//! Per-router route registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::NavigatorError;
use crate::route::{RedirectHook, RouteContext, RouteDeclaration};

/// The immutable route table of one router.
///
/// Lookup returns the first declaration, in registration order, whose
/// pattern matches; there is no other tie-break between overlapping
/// patterns.
///
/// # Example
///
/// ```
/// use reinhardt_navigator::{RouteContext, RouteRegistry};
///
/// let registry = RouteRegistry::new()
///     .route("/movies", |_: &RouteContext| "list")
///     .named_route("movie", "/movies/:id", |_: &RouteContext| "detail")
///     .initial_path("/movies");
///
/// assert!(registry.lookup("/movies/42").is_some());
/// assert_eq!(registry.reverse("movie", &[("id", "42")]).unwrap(), "/movies/42");
/// ```
pub struct RouteRegistry<V> {
	routes: Vec<RouteDeclaration<V>>,
	named_routes: HashMap<String, usize>,
	default_redirect: Option<RedirectHook>,
	initial_path: Option<String>,
}

impl<V> std::fmt::Debug for RouteRegistry<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteRegistry")
			.field("routes_count", &self.routes.len())
			.field(
				"named_routes",
				&self.named_routes.keys().collect::<Vec<_>>(),
			)
			.field("has_default_redirect", &self.default_redirect.is_some())
			.field("initial_path", &self.initial_path)
			.finish()
	}
}

impl<V> Default for RouteRegistry<V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V> RouteRegistry<V> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			named_routes: HashMap::new(),
			default_redirect: None,
			initial_path: None,
		}
	}

	/// Adds a route.
	///
	/// # Panics
	///
	/// Panics if the pattern is invalid.
	pub fn route<F>(self, pattern: &str, renderer: F) -> Self
	where
		F: Fn(&RouteContext) -> V + Send + Sync + 'static,
	{
		self.declare(RouteDeclaration::new(pattern, renderer))
	}

	/// Adds a named route.
	///
	/// # Panics
	///
	/// Panics if the pattern is invalid.
	pub fn named_route<F>(self, name: &str, pattern: &str, renderer: F) -> Self
	where
		F: Fn(&RouteContext) -> V + Send + Sync + 'static,
	{
		self.declare(RouteDeclaration::new(pattern, renderer).with_name(name))
	}

	/// Adds a fully configured declaration.
	pub fn declare(mut self, declaration: RouteDeclaration<V>) -> Self {
		if let Some(name) = declaration.name() {
			self.named_routes
				.insert(name.to_string(), self.routes.len());
		}
		self.routes.push(declaration);
		self
	}

	/// Sets the router-level redirect hook.
	///
	/// It applies to every push whose matching route has no hook of its own,
	/// including pushes that match no route at all.
	pub fn default_redirect<H>(mut self, hook: H) -> Self
	where
		H: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		self.default_redirect = Some(Arc::new(hook));
		self
	}

	/// Sets the path pushed once the router is mounted.
	pub fn initial_path(mut self, path: impl Into<String>) -> Self {
		self.initial_path = Some(path.into());
		self
	}

	/// Returns the first declaration matching `path`.
	pub fn lookup(&self, path: &str) -> Option<&RouteDeclaration<V>> {
		self.routes
			.iter()
			.find(|route| route.pattern().matches(path))
	}

	/// Evaluates the redirect hook that governs `path`.
	///
	/// The matching route's hook wins over the router default.
	pub fn redirect_for(&self, path: &str) -> Option<String> {
		let hook = self
			.lookup(path)
			.and_then(RouteDeclaration::redirect)
			.or(self.default_redirect.as_ref())?;
		hook(path)
	}

	/// Generates a concrete path for a named route.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::InvalidRouteName`] for an undeclared name and
	/// [`NavigatorError::MissingParameter`] when a parameter has no value.
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, NavigatorError> {
		let index = self
			.named_routes
			.get(name)
			.ok_or_else(|| NavigatorError::InvalidRouteName(name.to_string()))?;
		let pattern = self.routes[*index].pattern();
		let params_map: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		pattern.reverse(&params_map).ok_or_else(|| {
			let missing = pattern
				.param_names()
				.into_iter()
				.find(|name| params_map.get(*name).is_none_or(|v| v.is_empty()))
				.unwrap_or_default();
			NavigatorError::MissingParameter(missing.to_string())
		})
	}

	/// Returns the initial path, if any.
	pub fn initial(&self) -> Option<&str> {
		self.initial_path.as_deref()
	}

	/// Returns the declarations in registration order.
	pub fn routes(&self) -> &[RouteDeclaration<V>] {
		&self.routes
	}

	/// Returns the number of declared routes.
	pub fn route_count(&self) -> usize {
		self.routes.len()
	}

	/// Checks if a route name exists.
	pub fn has_named_route(&self, name: &str) -> bool {
		self.named_routes.contains_key(name)
	}
}
