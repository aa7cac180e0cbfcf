//! Binding lifecycle scopes.
//!
//! A scope decides what one `resolve` call costs:
//! - [`Scope::Prototype`] — a fresh instance per request
//! - [`Scope::Singleton`] — one instance, built on first resolve and
//!   cached for the rest of the assembly's life

use std::fmt;

/// Defines the lifetime of a resolved binding.
///
/// The default is [`Scope::Prototype`]: registrations that do not say
/// otherwise hand out a new instance on every resolve.
///
/// # Examples
/// ```
/// use bindery_container::scope::Scope;
///
/// assert_eq!(Scope::default(), Scope::Prototype);
/// assert!(Scope::Singleton.is_singleton());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A new instance is constructed on every resolve call.
    ///
    /// Never cached. Use for lightweight objects with per-consumer
    /// state.
    #[default]
    Prototype,

    /// One instance shared for the life of the assembly.
    ///
    /// The factory runs once, on first resolve; the result is cached
    /// and every later resolve returns it. Use for connection pools,
    /// configuration, shared caches.
    Singleton,
}

impl Scope {
    /// Returns `true` if this scope caches its instance after the
    /// first resolve.
    #[inline]
    pub fn is_singleton(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Prototype => write!(f, "Prototype"),
            Scope::Singleton => write!(f, "Singleton"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_prototype() {
        assert_eq!(Scope::default(), Scope::Prototype);
    }

    #[test]
    fn singleton_flag() {
        assert!(Scope::Singleton.is_singleton());
        assert!(!Scope::Prototype.is_singleton());
    }

    #[test]
    fn scope_display() {
        assert_eq!(format!("{}", Scope::Prototype), "Prototype");
        assert_eq!(format!("{}", Scope::Singleton), "Singleton");
    }
}
