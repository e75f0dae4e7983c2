//! Call-time dispatch resolution.
//!
//! The dispatcher turns a concrete invocation into an exact-key lookup:
//!
//! 1. Tag every argument with its exact dynamic type.
//! 2. Build the [`OverloadKey`] from the selector and the tag sequence.
//! 3. Resolve it through the registry: no table for the owner is
//!    [`MissingTable`]; a table without this exact key is
//!    [`MissingOverload`].
//! 4. Invoke the matched implementation and return its result verbatim.
//!
//! There is no fallback of any kind: no supertype match, no coercion, no
//! arity-agnostic search. A `bool` argument never matches an `i64`
//! overload. Matching happens outside the registry lock, so an
//! implementation is free to re-enter dispatch (overloads that delegate
//! to a sibling overload rely on this).
//!
//! [`MissingTable`]: crate::DispatchError::MissingTable
//! [`MissingOverload`]: crate::DispatchError::MissingOverload

use tracing::trace;

use crate::error::DispatchResult;
use crate::registry::Registry;
use crate::tag::{OverloadKey, Selector, TypeTag};
use crate::value::Value;

/// Resolves concrete calls against one registry.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
}

impl<'a> Dispatcher<'a> {
    /// A dispatcher over the given registry.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Free dispatch: the owner is the global scope and the key covers
    /// all positional arguments.
    pub fn call_function(
        &self,
        selector: impl Into<Selector>,
        args: &[Value],
    ) -> DispatchResult<Value> {
        let key = invocation_key(selector.into(), args);
        trace!(key = %key, "dispatching free call");
        let implementation = self.registry.function_overload(&key)?;
        (*implementation)(self.registry, args)
    }

    /// Bound dispatch: the owner is the receiver's runtime type and the
    /// key covers only the remaining positional arguments. The receiver
    /// is passed through to the matched implementation as its implicit
    /// first parameter.
    pub fn call_method(
        &self,
        receiver: &mut Value,
        selector: impl Into<Selector>,
        args: &[Value],
    ) -> DispatchResult<Value> {
        let owner = receiver.tag();
        let key = invocation_key(selector.into(), args);
        trace!(owner = %owner, key = %key, "dispatching bound call");
        let implementation = self.registry.method_overload(owner, &key)?;
        (*implementation)(self.registry, receiver, args)
    }
}

impl Registry {
    /// A dispatcher borrowing this registry.
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self)
    }
}

/// The key for a concrete invocation: each argument contributes the tag
/// of its exact dynamic type.
fn invocation_key(selector: Selector, args: &[Value]) -> OverloadKey {
    let tags: Vec<TypeTag> = args.iter().map(Value::tag).collect();
    OverloadKey::new(selector, tags)
}
