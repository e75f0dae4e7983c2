//! Dynamically typed argument and result carrier.
//!
//! Dispatch routes on the exact runtime type of each argument, so values
//! cross the call boundary as [`Value`]: a boxed `Any` paired with the
//! [`TypeTag`] captured when the value was boxed. The tag is what the
//! dispatcher keys on; the box is what a matched implementation downcasts.

use std::any::Any;
use std::fmt;

use thiserror::Error;

use crate::tag::TypeTag;

/// A downcast against the wrong runtime type.
///
/// Cannot occur for arguments of a matched overload (the key already
/// proved the types), but implementation bodies still surface it as an
/// ordinary error rather than panicking.
#[derive(Debug, Error)]
#[error("value is `{found}`, expected `{expected}`")]
pub struct TypeMismatch {
    /// The type the caller asked for.
    pub expected: TypeTag,
    /// The value's actual runtime type.
    pub found: TypeTag,
}

/// A value of some exact runtime type, as seen by the dispatcher.
pub struct Value {
    tag: TypeTag,
    inner: Box<dyn Any>,
}

impl Value {
    /// Boxes a value, capturing its exact type tag.
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// The unit value, for implementations with nothing to return.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// The tag of this value's exact dynamic type.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Whether the value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.tag == TypeTag::of::<T>()
    }

    /// Borrows the value as `T`, if that is its exact type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Mutably borrows the value as `T`, if that is its exact type.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }

    /// Borrows the value as `T`, reporting the actual type on mismatch.
    pub fn get<T: Any>(&self) -> Result<&T, TypeMismatch> {
        self.inner.downcast_ref().ok_or(TypeMismatch {
            expected: TypeTag::of::<T>(),
            found: self.tag,
        })
    }

    /// Mutably borrows the value as `T`, reporting the actual type on mismatch.
    pub fn get_mut<T: Any>(&mut self) -> Result<&mut T, TypeMismatch> {
        let found = self.tag;
        self.inner.downcast_mut().ok_or(TypeMismatch {
            expected: TypeTag::of::<T>(),
            found,
        })
    }

    /// Consumes the value, returning the inner `T`.
    pub fn take<T: Any>(self) -> Result<T, TypeMismatch> {
        let found = self.tag;
        match self.inner.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => Err(TypeMismatch {
                expected: TypeTag::of::<T>(),
                found,
            }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.tag.short_name())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::new(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::new(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::new(v)
    }
}

// String literals box as `String`, so a `&str` argument and a `String`
// argument carry the same tag.
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::new(v.to_string())
    }
}
