//! Fluent front end for accumulating binding batches.
//!
//! [`AssemblyBuilder`] stages registrations into an internally held
//! [`Assembly`] and hands the finished batch to the caller on
//! [`build`](AssemblyBuilder::build), after which the same builder is
//! ready for a new, independent batch.

use crate::injectable::{BindsTo, Injectable};
use crate::registry::Assembly;
use crate::scope::Scope;

/// Accumulates registrations and produces [`Assembly`] batches.
///
/// Registration methods return `&mut Self` for chaining. A built batch
/// is usually handed straight to
/// [`Context::register`](crate::context::Context::register).
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use bindery_container::builder::AssemblyBuilder;
/// use bindery_container::scope::Scope;
///
/// let mut builder = AssemblyBuilder::new();
/// builder
///     .add_factory(Scope::Singleton, || Arc::new(String::from("postgres://localhost")))
///     .add_factory(Scope::default(), || 42u32);
/// let assembly = builder.build();
/// assert_eq!(assembly.len(), 2);
/// ```
#[derive(Default)]
pub struct AssemblyBuilder {
    assembly: Assembly,
}

impl AssemblyBuilder {
    /// Creates a builder with an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a typed factory under the key of `T`.
    pub fn add_factory<T, F>(&mut self, scope: Scope, factory: F) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.assembly.add_factory(None, scope, factory);
        self
    }

    /// Stages a typed factory under the key of `T` with a binding name.
    pub fn add_named_factory<T, F>(
        &mut self,
        name: &'static str,
        scope: Scope,
        factory: F,
    ) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.assembly.add_factory(Some(name), scope, factory);
        self
    }

    /// Stages `T` built from its no-argument constructor, stored as
    /// `Arc<T>`.
    pub fn add_injectable<T: Injectable>(&mut self, scope: Scope) -> &mut Self {
        self.assembly.add_injectable::<T>(None, scope);
        self
    }

    /// Named variant of [`add_injectable`](AssemblyBuilder::add_injectable).
    pub fn add_named_injectable<T: Injectable>(
        &mut self,
        name: &'static str,
        scope: Scope,
    ) -> &mut Self {
        self.assembly.add_injectable::<T>(Some(name), scope);
        self
    }

    /// Stages `T` under the trait object `I` it binds to, stored as
    /// `Arc<I>`.
    pub fn add_injectable_as<T, I>(&mut self, scope: Scope) -> &mut Self
    where
        T: BindsTo<I>,
        I: ?Sized + Send + Sync + 'static,
    {
        self.assembly.add_injectable_as::<T, I>(None, scope);
        self
    }

    /// Named variant of [`add_injectable_as`](AssemblyBuilder::add_injectable_as).
    pub fn add_named_injectable_as<T, I>(&mut self, name: &'static str, scope: Scope) -> &mut Self
    where
        T: BindsTo<I>,
        I: ?Sized + Send + Sync + 'static,
    {
        self.assembly.add_injectable_as::<T, I>(Some(name), scope);
        self
    }

    /// Hands over the accumulated batch and resets the builder.
    ///
    /// The returned [`Assembly`] owns everything staged since the last
    /// `build`; the builder starts the next batch empty.
    pub fn build(&mut self) -> Assembly {
        std::mem::take(&mut self.assembly)
    }
}
