//! # Multimethods
//!
//! A runtime multiple-dispatch engine. Several implementations register
//! under one logical operation name (a *selector*), each keyed by the
//! exact runtime types of its parameters; at call time an invocation is
//! routed to the implementation whose key matches the dynamic types of
//! the actual arguments. This generalizes single-receiver virtual
//! dispatch to dispatch over the full parameter tuple, resolved per call.
//!
//! Matching is exact: being assignable to a broader type does not count,
//! there is no coercion, and arity is part of an overload's identity.
//!
//! ## Module Structure
//!
//! - [`tag`] - `TypeTag`, `Selector`, and `OverloadKey` identity types
//! - [`value`] - the dynamically typed argument/result carrier
//! - [`table`] - per-owner overload tables and the duplicate policy
//! - [`registry`] - owner scoping and the registration API
//! - [`dispatch`] - call-time resolution
//! - [`error`] - the dispatch error taxonomy
//!
//! ## Example
//!
//! ```
//! use multimethods::{tags, Registry, Value};
//!
//! let registry = Registry::new();
//! registry
//!     .register_function("double", tags![i64], |_, args| {
//!         Ok(Value::new(2 * args[0].get::<i64>()?))
//!     })
//!     .unwrap();
//! registry
//!     .register_function("double", tags![String], |_, args| {
//!         let s = args[0].get::<String>()?;
//!         Ok(Value::new(format!("{s}{s}")))
//!     })
//!     .unwrap();
//!
//! let result = registry.dispatcher().call_function("double", &[Value::new(3i64)]).unwrap();
//! assert_eq!(*result.get::<i64>().unwrap(), 6);
//!
//! // A `bool` is not an `i64`; exact types only.
//! assert!(registry.dispatcher().call_function("double", &[Value::new(true)]).is_err());
//! ```

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod table;
pub mod tag;
pub mod value;

pub use dispatch::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use registry::{BoundImpl, FreeImpl, Registry, RegistryError};
pub use table::{DuplicatePolicy, OverloadTable};
pub use tag::{OverloadKey, Selector, TypeTag};
pub use value::{TypeMismatch, Value};

/// Builds a `Vec<TypeTag>` from a list of types.
///
/// ```
/// use multimethods::{tags, TypeTag};
///
/// assert_eq!(tags![i64, String], vec![TypeTag::of::<i64>(), TypeTag::of::<String>()]);
/// let empty: Vec<TypeTag> = tags![];
/// assert_eq!(empty, Vec::<TypeTag>::new());
/// ```
#[macro_export]
macro_rules! tags {
    ($($ty:ty),* $(,)?) => {
        vec![$($crate::TypeTag::of::<$ty>()),*]
    };
}
