//! Error types for binding resolution.
//!
//! Exactly two things can go wrong when resolving, and both signal a
//! registration/consumption contract violation rather than a runtime
//! condition to retry: the key was never registered, or the stored
//! value's dynamic type does not match the requested one. The public
//! API surfaces them as a [`Result`] so the embedding application
//! decides between propagating and failing fast at its composition
//! root.

use std::fmt;

use bindery_support::rendering::shorten_type_name;

use crate::key::BindingKey;

/// Main error type for resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum BinderyError {
    /// The requested binding was never registered.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// The stored or constructed value is not of the requested type.
    #[error("{}", .0)]
    TypeMismatch(TypeMismatchError),
}

/// Error when a binding was not registered before its first resolve.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The binding that was requested
    pub requested: BindingKey,
    /// Registered bindings with similar type names
    pub suggestions: Vec<BindingKey>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No binding registered for {}", self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register {} before the first resolve",
            shorten_type_name(self.requested.type_name()),
        )
    }
}

/// Error when a binding's stored value fails the requested downcast.
///
/// The factory registered under this key produced a value of a
/// different type than the one call sites ask for.
#[derive(Debug)]
pub struct TypeMismatchError {
    /// The binding that was looked up
    pub key: BindingKey,
    /// The type the call site requested
    pub expected: &'static str,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Binding type mismatch for {}: stored value is not a {}",
            self.key,
            shorten_type_name(self.expected),
        )?;
        write!(
            f,
            "\n  Hint: the factory registered under this key produces a different type"
        )
    }
}

/// Convenient Result type for resolution operations.
pub type Result<T> = std::result::Result<T, BinderyError>;
