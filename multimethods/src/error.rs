//! Dispatch error taxonomy.
//!
//! A failed dispatch aborts only the single call, and the engine never
//! retries, falls back to a broader type, or recovers on the caller's
//! behalf. The two engine-level failures are distinguished so a wiring
//! bug (nothing ever registered for an owner) reads differently from a
//! call with an unsupported argument combination.

use std::fmt::Write as _;

use thiserror::Error;

use crate::tag::{OverloadKey, Selector, TypeTag};
use crate::value::TypeMismatch;

/// Result alias for dispatch and implementation bodies.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Why a dispatch call failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The owner identity has never had anything registered. This is a
    /// programming error: the operation was never wired up for this owner.
    #[error("no overloads registered for `{owner}`")]
    MissingTable {
        /// Diagnostic name of the owner scope.
        owner: String,
    },

    /// The owner has a table, but no entry matches the exact
    /// (selector, tag-sequence) pair built from the call's arguments.
    #[error("no overload of `{}` for argument types ({})", .selector, display_tags(.arg_types))]
    MissingOverload {
        /// The selector that was invoked.
        selector: Selector,
        /// The attempted argument tag sequence.
        arg_types: Vec<TypeTag>,
        /// Keys registered under this selector, for diagnostics.
        registered: Vec<OverloadKey>,
    },

    /// A failure produced inside a matched implementation body, passed
    /// through verbatim.
    #[error("{0}")]
    Implementation(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl DispatchError {
    /// Wraps a failure raised by an implementation body.
    pub fn implementation(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Implementation(Box::new(err))
    }

    /// Keys registered under the selector of a [`MissingOverload`] error;
    /// empty for the other variants.
    ///
    /// [`MissingOverload`]: DispatchError::MissingOverload
    pub fn known_overloads(&self) -> &[OverloadKey] {
        match self {
            Self::MissingOverload { registered, .. } => registered,
            _ => &[],
        }
    }
}

impl From<TypeMismatch> for DispatchError {
    fn from(err: TypeMismatch) -> Self {
        Self::Implementation(Box::new(err))
    }
}

fn display_tags(tags: &[TypeTag]) -> String {
    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{tag}");
    }
    out
}
