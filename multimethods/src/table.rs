//! Per-owner overload tables.
//!
//! An [`OverloadTable`] maps [`OverloadKey`]s to implementations for one
//! owner scope. The table never copies client closures; it holds `Arc`
//! references handed out again at dispatch time. Insertion order is
//! preserved so diagnostics list overloads in registration order.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::tag::{OverloadKey, Selector};

/// What to do when a registration hits an already-occupied key.
///
/// Registration is last-write-wins by default; [`Reject`] is the
/// stricter alternative for callers that want duplicate registration
/// surfaced as an error.
///
/// [`Reject`]: DuplicatePolicy::Reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Silently replace the previous implementation.
    #[default]
    Replace,
    /// Fail the registration, keeping the previous implementation.
    Reject,
}

/// All overloads registered for one owner.
///
/// `F` is the unsized implementation signature (bound or free); the table
/// itself only cares about key identity.
pub struct OverloadTable<F: ?Sized> {
    entries: IndexMap<OverloadKey, Arc<F>>,
}

impl<F: ?Sized> OverloadTable<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Inserts an implementation at `key` under the given policy.
    ///
    /// Returns the key back as the error when the policy is
    /// [`DuplicatePolicy::Reject`] and the key is already occupied.
    pub(crate) fn insert(
        &mut self,
        key: OverloadKey,
        implementation: Arc<F>,
        policy: DuplicatePolicy,
    ) -> Result<(), OverloadKey> {
        if policy == DuplicatePolicy::Reject && self.entries.contains_key(&key) {
            return Err(key);
        }
        self.entries.insert(key, implementation);
        Ok(())
    }

    /// The implementation registered under exactly `key`, if any.
    pub(crate) fn get(&self, key: &OverloadKey) -> Option<Arc<F>> {
        self.entries.get(key).cloned()
    }

    /// All keys registered under `selector`, in registration order.
    pub(crate) fn keys_for(&self, selector: &Selector) -> Vec<OverloadKey> {
        self.entries
            .keys()
            .filter(|key| key.selector() == selector)
            .cloned()
            .collect()
    }

    /// Number of registered overloads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no overloads.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: ?Sized> fmt::Debug for OverloadTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
