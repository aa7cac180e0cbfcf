//! Binding identification keys.
//!
//! [`BindingKey`] uniquely identifies a binding within an assembly.
//! It pairs a [`TypeIdentity`] with an optional binding name, so the
//! same type can be registered several times under different names.

use std::fmt;

use crate::identity::{TypeIdentity, Wrapped};

/// Uniquely identifies a binding in an assembly.
///
/// An unnamed key is self-keyed by its type: it is equal only to other
/// unnamed keys of the same type. A named key is equal only to keys
/// carrying both the same name and the same type, so `String` named
/// `"primary"` and `String` named `"replica"` are independent entries.
///
/// Keys are immutable once constructed.
///
/// # Examples
/// ```
/// use bindery_container::key::BindingKey;
///
/// let key = BindingKey::of::<String>();
/// assert_eq!(key.name(), None);
///
/// let key = BindingKey::named::<String>("database_url");
/// assert_eq!(key.name(), Some("database_url"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    name: Option<&'static str>,
    ty: TypeIdentity,
}

impl BindingKey {
    /// Builds a key from an optional explicit name and the type `T`.
    ///
    /// With a name present it is used verbatim; without one the key is
    /// self-keyed by the type identity alone.
    #[inline]
    pub fn make<T: ?Sized + 'static>(name: Option<&'static str>) -> Self {
        Self {
            name,
            ty: TypeIdentity::of::<T>(),
        }
    }

    /// Builds a key for an optional-wrapped request, landing on the
    /// inner type's binding.
    #[inline]
    pub fn make_wrapped<W: Wrapped>(name: Option<&'static str>) -> Self {
        Self {
            name,
            ty: TypeIdentity::of_wrapped::<W>(),
        }
    }

    /// Creates an unnamed key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::make::<T>(None)
    }

    /// Creates a named key for type `T`.
    #[inline]
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::make::<T>(Some(name))
    }

    /// Returns the optional binding name.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Returns the type component of the key.
    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.ty
    }

    /// Returns the human-readable type name, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.type_name()
    }
}

impl fmt::Debug for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "BindingKey({}, name={:?})", self.type_name(), name),
            None => write!(f, "BindingKey({})", self.type_name()),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{} (name={:?})", self.type_name(), name),
            None => write!(f, "{}", self.type_name()),
        }
    }
}
