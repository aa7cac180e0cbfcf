//! The assembly — a batch of bindings and the resolution algorithm.
//!
//! An [`Assembly`] maps [`BindingKey`]s to zero-argument factories,
//! cached singleton instances, and singleton flags. It is populated by
//! [`add`](Assembly::add) (usually through an
//! [`AssemblyBuilder`](crate::builder::AssemblyBuilder)), combined with
//! other batches via [`merge`](Assembly::merge), and queried with
//! [`resolve`](Assembly::resolve).
//!
//! Per key, the life of a binding is: registered as prototype and
//! resolved fresh any number of times, or registered as singleton,
//! constructed once on first resolve, then served from the instance
//! cache (the factory entry is removed at that point, so construction
//! happens at most once). Only [`empty`](Assembly::empty) returns keys
//! to the unregistered state.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use bindery_support::rendering::suggest_similar;

use crate::error::{BinderyError, NotRegisteredError, Result, TypeMismatchError};
use crate::identity::Wrapped;
use crate::injectable::{BindsTo, Injectable};
use crate::key::BindingKey;
use crate::scope::Scope;

/// Type alias for factory functions.
///
/// A factory takes no arguments and returns a type-erased value. It
/// may do arbitrary work, including resolving its own dependencies
/// through the process-wide [`Context`](crate::context::Context).
///
/// `Arc` rather than `Box` because factories are shared across threads
/// and cloned out of the map so resolution can run without holding a
/// lock over the invocation.
pub type FactoryFn = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// A batch of bindings: factories, cached singletons, singleton flags.
///
/// Values are registered under the type the call site will request.
/// The working convention for services is to register `Arc<Service>`
/// (or `Arc<dyn Trait>` for trait bindings), which makes singleton
/// sharing cheap and gives [`weak
/// resolution`](crate::context::Context::weak_resolve) something to
/// downgrade; plain `Clone` values work too.
#[derive(Default)]
pub struct Assembly {
    factories: HashMap<BindingKey, FactoryFn>,
    instances: HashMap<BindingKey, Box<dyn Any + Send + Sync>>,
    singletons: HashMap<BindingKey, bool>,
}

impl Assembly {
    /// Creates an empty assembly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the factory for `key`.
    ///
    /// Singleton-scoped keys are flagged for caching on first resolve.
    /// The factory's return type is not validated here; a mismatch
    /// surfaces as [`BinderyError::TypeMismatch`] at resolution.
    pub fn add(&mut self, key: BindingKey, factory: FactoryFn, scope: Scope) {
        debug!(key = %key, scope = %scope, "Registered binding");
        if scope.is_singleton() {
            self.singletons.insert(key.clone(), true);
        }
        self.factories.insert(key, factory);
    }

    /// Registers a typed factory under the key of `T`.
    ///
    /// ```
    /// use bindery_container::registry::Assembly;
    /// use bindery_container::scope::Scope;
    ///
    /// let mut assembly = Assembly::new();
    /// assembly.add_factory(None, Scope::Prototype, || 42u32);
    /// let value: u32 = assembly.resolve(None).unwrap();
    /// assert_eq!(value, 42);
    /// ```
    pub fn add_factory<T, F>(&mut self, name: Option<&'static str>, scope: Scope, factory: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let key = BindingKey::make::<T>(name);
        self.add(
            key,
            Arc::new(move || Box::new(factory()) as Box<dyn Any + Send + Sync>),
            scope,
        );
    }

    /// Registers `T` built from its no-argument constructor.
    ///
    /// The binding is stored as `Arc<T>`, so call sites resolve
    /// `Arc<T>`.
    pub fn add_injectable<T: Injectable>(&mut self, name: Option<&'static str>, scope: Scope) {
        let key = BindingKey::make::<Arc<T>>(name);
        self.add(
            key,
            Arc::new(|| Box::new(Arc::new(T::construct())) as Box<dyn Any + Send + Sync>),
            scope,
        );
    }

    /// Registers `T` under the trait object `I` it binds to.
    ///
    /// The binding is stored as `Arc<I>` and keyed by `Arc<I>`, so call
    /// sites resolve `Arc<I>` without knowing the concrete type. The
    /// factory variant of trait binding needs no dedicated method: a
    /// closure passed to [`add_factory`](Assembly::add_factory) writes
    /// the coercion itself (`|| Arc::new(Concrete::new()) as Arc<dyn I>`).
    pub fn add_injectable_as<T, I>(&mut self, name: Option<&'static str>, scope: Scope)
    where
        T: BindsTo<I>,
        I: ?Sized + Send + Sync + 'static,
    {
        let key = BindingKey::make::<Arc<I>>(name);
        self.add(
            key,
            Arc::new(|| Box::new(T::upcast(Arc::new(T::construct()))) as Box<dyn Any + Send + Sync>),
            scope,
        );
    }

    /// Merges another batch into this one.
    ///
    /// Applied per map: on key collision the incoming entry wins, keys
    /// unique to either side are preserved. Not commutative.
    pub fn merge(&mut self, other: Assembly) {
        debug!(incoming = other.len(), existing = self.len(), "Merging assembly");
        self.factories.extend(other.factories);
        self.instances.extend(other.instances);
        self.singletons.extend(other.singletons);
    }

    /// Resolves a value for type `T`, optionally under a binding name.
    ///
    /// Singleton-flagged keys are constructed on first call and served
    /// from the instance cache afterwards; prototype keys get a fresh
    /// instance every call.
    ///
    /// # Errors
    /// [`BinderyError::NotRegistered`] when no factory or cached
    /// instance exists for the key, [`BinderyError::TypeMismatch`] when
    /// the stored value fails the downcast to `T`. Both signal a
    /// registration/consumption bug; there is no recoverable fallback.
    pub fn resolve<T: Clone + Send + Sync + 'static>(
        &mut self,
        name: Option<&'static str>,
    ) -> Result<T> {
        self.resolve_keyed(BindingKey::make::<T>(name))
    }

    /// Resolves an optional-typed request against the inner type's
    /// binding.
    ///
    /// `resolve_wrapped::<Option<Arc<X>>>(None)` hits the entry
    /// registered for `Arc<X>` and wraps the result.
    pub fn resolve_wrapped<W: Wrapped>(&mut self, name: Option<&'static str>) -> Result<W> {
        let inner = self.resolve_keyed::<W::Inner>(BindingKey::make_wrapped::<W>(name))?;
        Ok(W::wrap(inner))
    }

    pub(crate) fn resolve_keyed<T: Clone + Send + Sync + 'static>(
        &mut self,
        key: BindingKey,
    ) -> Result<T> {
        trace!(key = %key, "Resolving");

        if let Some(value) = self.cached_instance::<T>(&key)? {
            return Ok(value);
        }

        let Some((factory, singleton)) = self.factory(&key) else {
            return Err(self.not_registered(key));
        };

        let produced = factory();
        if singleton {
            self.promote::<T>(key, produced)
        } else {
            downcast_produced::<T>(key, produced)
        }
    }

    /// Returns the cached singleton instance for `key`, if any.
    pub(crate) fn cached_instance<T: Clone + Send + Sync + 'static>(
        &self,
        key: &BindingKey,
    ) -> Result<Option<T>> {
        let Some(stored) = self.instances.get(key) else {
            return Ok(None);
        };
        let value = stored
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| type_mismatch::<T>(key.clone()))?;
        Ok(Some(value))
    }

    /// Returns the factory and singleton flag for `key`, if registered.
    pub(crate) fn factory(&self, key: &BindingKey) -> Option<(FactoryFn, bool)> {
        let factory = self.factories.get(key)?.clone();
        let singleton = self.singletons.get(key).copied().unwrap_or(false);
        Some((factory, singleton))
    }

    /// Stores a freshly produced singleton and drops its factory entry.
    ///
    /// When two resolvers race through the unlocked construction
    /// window, the first stored instance wins and the loser's value is
    /// discarded, so identity still converges.
    pub(crate) fn promote<T: Clone + Send + Sync + 'static>(
        &mut self,
        key: BindingKey,
        produced: Box<dyn Any + Send + Sync>,
    ) -> Result<T> {
        let stored = self.instances.entry(key.clone()).or_insert(produced);
        let value = stored
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| type_mismatch::<T>(key.clone()))?;
        self.factories.remove(&key);
        trace!(key = %key, "Cached singleton instance");
        Ok(value)
    }

    pub(crate) fn not_registered(&self, requested: BindingKey) -> BinderyError {
        let keys: Vec<&BindingKey> = self.factories.keys().chain(self.instances.keys()).collect();
        let names: Vec<&str> = keys.iter().map(|key| key.type_name()).collect();
        let suggestions = suggest_similar(requested.type_name(), &names, 3)
            .into_iter()
            .map(|index| keys[index].clone())
            .collect();
        BinderyError::NotRegistered(NotRegisteredError {
            requested,
            suggestions,
        })
    }

    /// Clears all three maps. Idempotent.
    pub fn empty(&mut self) {
        debug!(bindings = self.len(), "Emptying assembly");
        self.factories.clear();
        self.instances.clear();
        self.singletons.clear();
    }

    /// Number of live bindings (registered or already promoted).
    pub fn len(&self) -> usize {
        self.factories.len()
            + self
                .instances
                .keys()
                .filter(|key| !self.factories.contains_key(key))
                .count()
    }

    /// Returns `true` if no bindings are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.instances.is_empty()
    }
}

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("factories", &self.factories.len())
            .field("instances", &self.instances.len())
            .field("singletons", &self.singletons.len())
            .finish()
    }
}

pub(crate) fn downcast_produced<T: Send + Sync + 'static>(
    key: BindingKey,
    produced: Box<dyn Any + Send + Sync>,
) -> Result<T> {
    produced
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| type_mismatch::<T>(key))
}

pub(crate) fn type_mismatch<T: ?Sized + 'static>(key: BindingKey) -> BinderyError {
    BinderyError::TypeMismatch(TypeMismatchError {
        key,
        expected: type_name::<T>(),
    })
}
