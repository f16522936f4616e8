//! Opaque navigation arguments and their history codecs.
//!
//! In-process navigation hands the live argument object through unchanged.
//! A codec is only consulted when a configuration is saved to, or restored
//! from, a history record.

use std::any::Any;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::NavigatorError;

/// A type-erased value attached to a route entry.
///
/// Cloning is cheap: clones share the same underlying value.
#[derive(Clone)]
pub struct RouteArgument(Arc<dyn Any + Send + Sync>);

impl RouteArgument {
	/// Wraps a value.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self(Arc::new(value))
	}

	/// Returns the value if it has type `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref::<T>()
	}

	/// Returns whether the value has type `T`.
	pub fn is<T: Any>(&self) -> bool {
		self.0.is::<T>()
	}

	/// Returns whether both handles share the same value.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl std::fmt::Debug for RouteArgument {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("RouteArgument").field(&"..").finish()
	}
}

type EncodeFn = Arc<dyn Fn(&RouteArgument) -> Option<Value> + Send + Sync>;
type DecodeFn = Arc<dyn Fn(Value) -> Result<RouteArgument, NavigatorError> + Send + Sync>;

/// Bidirectional conversion between a route's argument and JSON.
#[derive(Clone)]
pub struct ArgumentCodec {
	encode: EncodeFn,
	decode: DecodeFn,
}

impl ArgumentCodec {
	/// Creates a codec from explicit encode/decode functions.
	///
	/// `encode` returns `None` when the argument is not representable, in
	/// which case the saved record carries no data.
	pub fn new<E, D>(encode: E, decode: D) -> Self
	where
		E: Fn(&RouteArgument) -> Option<Value> + Send + Sync + 'static,
		D: Fn(Value) -> Result<RouteArgument, NavigatorError> + Send + Sync + 'static,
	{
		Self {
			encode: Arc::new(encode),
			decode: Arc::new(decode),
		}
	}

	/// Creates a codec for any serde type.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_navigator::{ArgumentCodec, RouteArgument};
	///
	/// let codec = ArgumentCodec::json::<u32>();
	/// let value = codec.encode(&RouteArgument::new(7u32)).unwrap();
	/// let decoded = codec.decode(value).unwrap();
	/// assert_eq!(decoded.downcast_ref::<u32>(), Some(&7));
	/// ```
	pub fn json<T>() -> Self
	where
		T: Serialize + DeserializeOwned + Send + Sync + 'static,
	{
		Self::new(
			|argument| {
				argument
					.downcast_ref::<T>()
					.and_then(|value| serde_json::to_value(value).ok())
			},
			|value| {
				serde_json::from_value::<T>(value)
					.map(RouteArgument::new)
					.map_err(|e| NavigatorError::ArgumentCodec(e.to_string()))
			},
		)
	}

	/// Encodes an argument for a history record.
	pub fn encode(&self, argument: &RouteArgument) -> Option<Value> {
		(self.encode)(argument)
	}

	/// Decodes an argument from a history record.
	///
	/// # Errors
	///
	/// Returns [`NavigatorError::ArgumentCodec`] when the data does not fit.
	pub fn decode(&self, value: Value) -> Result<RouteArgument, NavigatorError> {
		(self.decode)(value)
	}
}

impl std::fmt::Debug for ArgumentCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ArgumentCodec").finish_non_exhaustive()
	}
}
