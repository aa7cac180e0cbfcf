//! Stable type identities for binding lookup.
//!
//! [`TypeIdentity`] pins a binding to a Rust type via [`TypeId`], with
//! the human-readable [`type_name`] carried along for logs and error
//! messages. Optional-typed call sites are mapped onto their inner
//! binding through the [`Wrapped`] trait, so a value requested as
//! `Option<X>` lands on the entry registered for `X`.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a Rust type, stable within one process run.
///
/// Two identities are equal iff they were derived from the same type;
/// distinct types can never collide because comparison happens on the
/// compiler-issued [`TypeId`], not on a formatted name.
///
/// # Examples
/// ```
/// use bindery_container::identity::TypeIdentity;
///
/// assert_eq!(TypeIdentity::of::<String>(), TypeIdentity::of::<String>());
/// assert_ne!(TypeIdentity::of::<String>(), TypeIdentity::of::<i32>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    name: &'static str,
}

impl TypeIdentity {
    /// Derives the identity of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Derives the identity of the type inside an optional wrapper.
    ///
    /// Strips exactly one wrapper level, so
    /// `of_wrapped::<Option<X>>() == of::<X>()`.
    ///
    /// # Examples
    /// ```
    /// use bindery_container::identity::TypeIdentity;
    ///
    /// assert_eq!(
    ///     TypeIdentity::of_wrapped::<Option<String>>(),
    ///     TypeIdentity::of::<String>(),
    /// );
    /// ```
    #[inline]
    pub fn of_wrapped<W: Wrapped>() -> Self {
        Self::of::<W::Inner>()
    }

    /// Returns the underlying [`TypeId`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the human-readable type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({})", self.name)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A one-level optional wrapper around a resolvable value.
///
/// Implemented for [`Option`]. Resolution entry points taking a
/// `W: Wrapped` compute the binding key from `W::Inner` and wrap the
/// resolved value on the way out, which is how a field typed
/// `Option<Arc<Service>>` resolves the `Arc<Service>` registration.
pub trait Wrapped: Sized + 'static {
    /// The type the binding was registered under.
    type Inner: Clone + Send + Sync + 'static;

    /// Wraps a resolved inner value.
    fn wrap(inner: Self::Inner) -> Self;
}

impl<T: Clone + Send + Sync + 'static> Wrapped for Option<T> {
    type Inner = T;

    fn wrap(inner: T) -> Self {
        Some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Widget;

    #[test]
    fn same_type_same_identity() {
        assert_eq!(TypeIdentity::of::<Widget>(), TypeIdentity::of::<Widget>());
    }

    #[test]
    fn distinct_types_distinct_identities() {
        assert_ne!(TypeIdentity::of::<Widget>(), TypeIdentity::of::<String>());
    }

    #[test]
    fn optional_collapses_to_inner() {
        assert_eq!(
            TypeIdentity::of_wrapped::<Option<Arc<Widget>>>(),
            TypeIdentity::of::<Arc<Widget>>(),
        );
    }

    #[test]
    fn only_one_wrapper_level_is_stripped() {
        // Option<Option<X>> keys on Option<X>, not X
        assert_eq!(
            TypeIdentity::of_wrapped::<Option<Option<String>>>(),
            TypeIdentity::of::<Option<String>>(),
        );
        assert_ne!(
            TypeIdentity::of_wrapped::<Option<Option<String>>>(),
            TypeIdentity::of::<String>(),
        );
    }

    #[test]
    fn identity_of_unsized_type() {
        trait Port {}
        let identity = TypeIdentity::of::<dyn Port>();
        assert!(identity.type_name().contains("Port"));
    }

    #[test]
    fn display_uses_type_name() {
        let rendered = format!("{}", TypeIdentity::of::<String>());
        assert!(rendered.contains("String"));
    }

    #[test]
    fn wrap_restores_the_optional_shape() {
        let wrapped: Option<i32> = Wrapped::wrap(7);
        assert_eq!(wrapped, Some(7));
    }
}
