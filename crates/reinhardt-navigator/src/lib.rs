//! Hierarchical route-stack navigation for Reinhardt.
//!
//! This crate keeps page stacks for a tree of nested routers:
//!
//! - **Route matching**: `:param` patterns matched segment by segment, first
//!   declaration wins
//! - **Navigation stacks**: push, replace, pop and pop-until per router, with
//!   exact-path deduplication and redirect hooks
//! - **Nested routers**: child routers with independent stacks, mirrored into
//!   one chronological stack at the root
//! - **History**: save the latest entry as a `{path, state}` record and
//!   restore it into the right router
//!
//! # Quick Start
//!
//! ```rust
//! use reinhardt_navigator::{RouteContext, RouteRegistry, RouterTree};
//!
//! let mut tree = RouterTree::new(
//!     RouteRegistry::new()
//!         .route("/", |_: &RouteContext| "home".to_string())
//!         .named_route("movie", "/movies/:id", |ctx: &RouteContext| {
//!             format!("movie {}", ctx.params.get("id").unwrap_or_default())
//!         })
//!         .initial_path("/"),
//! );
//! let details = tree
//!     .mount(tree.root(), "details", RouteRegistry::new().route("/cast", |_: &RouteContext| "cast".to_string()))
//!     .unwrap();
//!
//! // Initial paths are pushed by the deferred task queue.
//! tree.flush();
//!
//! let mut root = tree.router(tree.root()).unwrap();
//! let path = root.reverse("movie", &[("id", "42")]).unwrap();
//! root.push(&path, None);
//!
//! let pages: Vec<String> = root.projection().iter().map(|page| page.render()).collect();
//! assert_eq!(pages, vec!["home", "movie 42"]);
//!
//! tree.router(details).unwrap().push("/cast", None);
//! let saved = tree.save_configuration().unwrap();
//! assert_eq!(saved.state.meta.router_name, "details");
//! ```

pub mod argument;
pub mod error;
pub mod event;
pub mod history;
pub mod navigation;
pub mod params;
pub mod pattern;
pub mod projection;
pub mod registry;
pub mod route;
pub mod scheduler;
pub mod settings;
pub mod signal;
pub mod stack;
pub mod tree;

// Re-export main types for convenience
pub use argument::{ArgumentCodec, RouteArgument};
pub use error::NavigatorError;
pub use event::{NavigationEvent, PathChanged, StackChanged};
pub use history::{
	HistoryMeta, HistoryRecord, HistoryState, NavigationConfiguration, ResolvedConfiguration,
};
pub use navigation::{NavigationOutcome, Navigator};
pub use params::RouteParams;
pub use pattern::{RoutePattern, Segment};
pub use projection::{ProjectionPass, RenderEntry};
pub use registry::RouteRegistry;
pub use route::{RedirectHook, Renderer, RouteContext, RouteDeclaration};
pub use scheduler::{Task, TaskQueue};
pub use settings::{DEFAULT_MAX_REDIRECT_HOPS, NavigatorSettings};
pub use signal::{ReceiverId, Signal};
pub use stack::RouteEntry;
pub use tree::{RouterId, RouterNode, RouterTree};

/// Result type for navigator operations.
pub type NavigatorResult<T> = Result<T, NavigatorError>;
