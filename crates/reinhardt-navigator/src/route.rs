//! Route declarations.
//!
//! A [`RouteDeclaration`] binds a [`RoutePattern`] to a renderer and,
//! optionally, a redirect hook, an argument codec and a name for reverse
//! lookups. Declarations are immutable once added to a registry.

use std::sync::Arc;

use crate::argument::{ArgumentCodec, RouteArgument};
use crate::error::NavigatorError;
use crate::params::RouteParams;
use crate::pattern::RoutePattern;
use crate::tree::RouterId;

/// Produces the host's view for a route entry.
pub type Renderer<V> = Arc<dyn Fn(&RouteContext) -> V + Send + Sync>;

/// Maps a requested path to a substitute path, or `None` for no redirect.
pub type RedirectHook = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Everything a renderer receives about the entry it renders.
#[derive(Debug, Clone)]
pub struct RouteContext {
	/// Concrete path of the entry.
	pub path: String,
	/// Parameters captured from the path.
	pub params: RouteParams,
	/// Live argument passed on push, or decoded on restoration.
	pub argument: Option<RouteArgument>,
	/// Router that owns the entry.
	pub router: RouterId,
}

/// A single route declaration.
pub struct RouteDeclaration<V> {
	pattern: RoutePattern,
	name: Option<String>,
	renderer: Renderer<V>,
	redirect: Option<RedirectHook>,
	codec: Option<ArgumentCodec>,
}

impl<V> Clone for RouteDeclaration<V> {
	fn clone(&self) -> Self {
		Self {
			pattern: self.pattern.clone(),
			name: self.name.clone(),
			renderer: Arc::clone(&self.renderer),
			redirect: self.redirect.clone(),
			codec: self.codec.clone(),
		}
	}
}

impl<V> std::fmt::Debug for RouteDeclaration<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDeclaration")
			.field("pattern", &self.pattern)
			.field("name", &self.name)
			.field("has_redirect", &self.redirect.is_some())
			.field("has_codec", &self.codec.is_some())
			.finish()
	}
}

impl<V> RouteDeclaration<V> {
	/// Creates a new declaration.
	///
	/// # Panics
	///
	/// Panics if the pattern is invalid. Use [`RouteDeclaration::try_new`]
	/// for fallible construction.
	pub fn new<F>(pattern: &str, renderer: F) -> Self
	where
		F: Fn(&RouteContext) -> V + Send + Sync + 'static,
	{
		Self::try_new(pattern, renderer)
			.unwrap_or_else(|e| panic!("Invalid route pattern '{}': {}", pattern, e))
	}

	/// Creates a new declaration, rejecting invalid patterns.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::InvalidPattern`] if the pattern is invalid.
	pub fn try_new<F>(pattern: &str, renderer: F) -> Result<Self, NavigatorError>
	where
		F: Fn(&RouteContext) -> V + Send + Sync + 'static,
	{
		Ok(Self {
			pattern: RoutePattern::new(pattern)?,
			name: None,
			renderer: Arc::new(renderer),
			redirect: None,
			codec: None,
		})
	}

	/// Names this route for [`RouteRegistry::reverse`](crate::RouteRegistry::reverse).
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Adds a route-level redirect hook.
	///
	/// It takes precedence over the router's default hook.
	pub fn with_redirect<H>(mut self, hook: H) -> Self
	where
		H: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		self.redirect = Some(Arc::new(hook));
		self
	}

	/// Adds an argument codec used by history save/restore.
	pub fn with_codec(mut self, codec: ArgumentCodec) -> Self {
		self.codec = Some(codec);
		self
	}

	/// Returns the pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the route name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the renderer.
	pub fn renderer(&self) -> &Renderer<V> {
		&self.renderer
	}

	/// Returns the route-level redirect hook.
	pub fn redirect(&self) -> Option<&RedirectHook> {
		self.redirect.as_ref()
	}

	/// Returns the argument codec.
	pub fn codec(&self) -> Option<&ArgumentCodec> {
		self.codec.as_ref()
	}

	/// Renders this route for a context.
	pub fn render(&self, ctx: &RouteContext) -> V {
		(self.renderer)(ctx)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn ctx(path: &str) -> RouteContext {
		RouteContext {
			path: path.to_string(),
			params: RouteParams::new(),
			argument: None,
			router: RouterId::ROOT,
		}
	}

	#[rstest]
	fn test_declaration_render() {
		let route = RouteDeclaration::new("/movies", |ctx: &RouteContext| ctx.path.clone());
		assert_eq!(route.render(&ctx("/movies")), "/movies");
		assert!(route.name().is_none());
	}

	#[rstest]
	fn test_declaration_builders() {
		let route = RouteDeclaration::new("/admin", |_: &RouteContext| ())
			.with_name("admin")
			.with_redirect(|_| Some("/login".to_string()))
			.with_codec(ArgumentCodec::json::<u32>());

		assert_eq!(route.name(), Some("admin"));
		let hook = route.redirect().unwrap();
		assert_eq!(hook("/admin"), Some("/login".to_string()));
		assert!(route.codec().is_some());
	}

	#[rstest]
	fn test_try_new_rejects_invalid_pattern() {
		let result = RouteDeclaration::try_new("/movies/:", |_: &RouteContext| ());
		assert!(matches!(result, Err(NavigatorError::InvalidPattern { .. })));
	}

	#[rstest]
	#[should_panic(expected = "Invalid route pattern")]
	fn test_new_panics_on_invalid_pattern() {
		let _ = RouteDeclaration::new("/movies/:", |_: &RouteContext| ());
	}
}
