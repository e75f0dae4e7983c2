//! Identity types for dispatch keys.
//!
//! A dispatch key is a selector (the operation's name) plus the ordered
//! sequence of the call's exact argument types. [`TypeTag`] pins down one
//! runtime type, [`Selector`] names the operation, and [`OverloadKey`]
//! combines the two with structural equality and hashing.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of one runtime type.
///
/// Two tags are equal iff they denote the same runtime type; the identity
/// is the `TypeId`, stable for the process lifetime. The type name is
/// captured alongside purely for diagnostics and never participates in
/// equality or hashing. There is no subtype relation between tags:
/// `bool` and `i64` are simply different identities.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// The tag for a concrete type.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name without its module path, e.g. `String`.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.short_name())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Strips the module path from a type name, leaving generic arguments
/// intact: `alloc::vec::Vec<alloc::string::String>` becomes
/// `Vec<alloc::string::String>`.
fn short_type_name(full: &'static str) -> &'static str {
    let bytes = full.as_bytes();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    &full[start..]
}

/// Name of one logical multi-way dispatched operation, e.g. `set`.
///
/// Cheap to clone; dispatch builds one key per call.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Selector(Arc<str>);

impl Selector {
    /// The selector's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({:?})", &*self.0)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One registered or queried dispatch signature: a selector plus the
/// ordered tag sequence of its parameters.
///
/// Equality and hashing are structural, and the sequence length is part
/// of the identity, so overloads of the same selector with different
/// arities never collide.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OverloadKey {
    selector: Selector,
    tags: Vec<TypeTag>,
}

impl OverloadKey {
    /// Builds a key from a selector and an ordered tag sequence.
    pub fn new(selector: impl Into<Selector>, tags: Vec<TypeTag>) -> Self {
        Self {
            selector: selector.into(),
            tags,
        }
    }

    /// The selector this key belongs to.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The parameter tag sequence.
    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    /// Number of parameters in the key.
    pub fn arity(&self) -> usize {
        self.tags.len()
    }
}

impl fmt::Display for OverloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.selector)?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for OverloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverloadKey({self})")
    }
}
