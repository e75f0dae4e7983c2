//! The registry: all overload tables, scoped by owner.
//!
//! An owner is either a type (bound, method-style dispatch, keyed by the
//! receiver's [`TypeTag`]) or the single well-known global scope (free
//! function dispatch). Tables are created lazily on the first registration
//! for their owner and are never removed, so "owner has no table at all"
//! stays observable and distinct from "table has no such key".
//!
//! The registry starts empty and is mutated only through the registration
//! API. Registration is expected to complete during initialization;
//! afterwards, lookups may run concurrently without restriction.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::error::{DispatchError, DispatchResult};
use crate::table::{DuplicatePolicy, OverloadTable};
use crate::tag::{OverloadKey, Selector, TypeTag};
use crate::value::Value;

/// Diagnostic name of the free-function scope.
pub(crate) const GLOBAL_SCOPE: &str = "<global>";

/// Signature of a free-function overload.
///
/// The registry handle lets an implementation re-enter dispatch.
pub type FreeImpl = dyn Fn(&Registry, &[Value]) -> DispatchResult<Value> + Send + Sync;

/// Signature of a bound (method-style) overload. The receiver is the
/// implicit first parameter; it is excluded from the dispatch key.
pub type BoundImpl = dyn Fn(&Registry, &mut Value, &[Value]) -> DispatchResult<Value> + Send + Sync;

/// Registration errors. Under [`DuplicatePolicy::Replace`] (the default)
/// registration never fails.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The key is already occupied and the registry's policy is
    /// [`DuplicatePolicy::Reject`].
    #[error("overload `{key}` already registered for `{owner}`")]
    Duplicate {
        /// Diagnostic name of the owner scope.
        owner: String,
        /// The occupied key.
        key: OverloadKey,
    },
}

/// Process-wide mapping from owner identity to overload table.
pub struct Registry {
    policy: DuplicatePolicy,
    /// Bound dispatch tables, keyed by the receiver's runtime type.
    methods: RwLock<FxHashMap<TypeTag, OverloadTable<BoundImpl>>>,
    /// The global scope's table; `None` until the first free registration.
    functions: RwLock<Option<OverloadTable<FreeImpl>>>,
}

impl Registry {
    /// An empty registry with the default last-write-wins policy.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// An empty registry with an explicit duplicate-registration policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            methods: RwLock::new(FxHashMap::default()),
            functions: RwLock::new(None),
        }
    }

    /// The process-wide registry instance.
    ///
    /// Empty at process start; populated only through the registration
    /// API, typically during program initialization.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// This registry's duplicate-registration policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Registers a free-function overload under the global scope.
    pub fn register_function<F>(
        &self,
        selector: impl Into<Selector>,
        tags: Vec<TypeTag>,
        implementation: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Registry, &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        let key = OverloadKey::new(selector, tags);
        debug!(key = %key, "registering function overload");
        let mut functions = self.functions.write();
        let table = functions.get_or_insert_with(OverloadTable::new);
        table
            .insert(key, Arc::new(implementation), self.policy)
            .map_err(|key| RegistryError::Duplicate {
                owner: GLOBAL_SCOPE.to_string(),
                key,
            })
    }

    /// Registers a method overload owned by the receiver type `T`.
    pub fn register_method<T, F>(
        &self,
        selector: impl Into<Selector>,
        tags: Vec<TypeTag>,
        implementation: F,
    ) -> Result<(), RegistryError>
    where
        T: Any,
        F: Fn(&Registry, &mut Value, &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        self.register_method_for(TypeTag::of::<T>(), selector, tags, implementation)
    }

    /// Registers a method overload under an explicit owner tag.
    pub fn register_method_for<F>(
        &self,
        owner: TypeTag,
        selector: impl Into<Selector>,
        tags: Vec<TypeTag>,
        implementation: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Registry, &mut Value, &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        let key = OverloadKey::new(selector, tags);
        debug!(owner = %owner, key = %key, "registering method overload");
        let mut methods = self.methods.write();
        let table = methods.entry(owner).or_insert_with(OverloadTable::new);
        table
            .insert(key, Arc::new(implementation), self.policy)
            .map_err(|key| RegistryError::Duplicate {
                owner: owner.short_name().to_string(),
                key,
            })
    }

    /// Looks up the free overload registered under exactly `key`.
    ///
    /// Clones the `Arc` out of the table so the caller can invoke it
    /// after the lock is released.
    pub(crate) fn function_overload(&self, key: &OverloadKey) -> DispatchResult<Arc<FreeImpl>> {
        let functions = self.functions.read();
        let table = functions.as_ref().ok_or_else(|| DispatchError::MissingTable {
            owner: GLOBAL_SCOPE.to_string(),
        })?;
        table.get(key).ok_or_else(|| missing_overload(table, key))
    }

    /// Looks up the bound overload registered for `owner` under exactly `key`.
    pub(crate) fn method_overload(
        &self,
        owner: TypeTag,
        key: &OverloadKey,
    ) -> DispatchResult<Arc<BoundImpl>> {
        let methods = self.methods.read();
        let table = methods.get(&owner).ok_or_else(|| DispatchError::MissingTable {
            owner: owner.short_name().to_string(),
        })?;
        table.get(key).ok_or_else(|| missing_overload(table, key))
    }

    /// Whether any overload has been registered for the given owner type.
    pub fn has_owner(&self, owner: TypeTag) -> bool {
        self.methods.read().contains_key(&owner)
    }

    /// Whether any free-function overload has been registered.
    pub fn has_functions(&self) -> bool {
        self.functions.read().is_some()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_overload<F: ?Sized>(table: &OverloadTable<F>, key: &OverloadKey) -> DispatchError {
    DispatchError::MissingOverload {
        selector: key.selector().clone(),
        arg_types: key.tags().to_vec(),
        registered: table.keys_for(key.selector()),
    }
}
