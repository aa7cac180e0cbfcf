//! The context — process-wide resolution point.
//!
//! A [`Context`] owns one live [`Assembly`] behind a lock and is the
//! sole access point consumers use: batches are merged in through
//! [`register`](Context::register), values come out through the
//! `resolve` family.
//!
//! # Architecture
//! ```text
//! AssemblyBuilder ──build()──> Assembly
//!                                 │
//!                     Context::register(assembly)
//!                                 │
//!                                 ▼
//!                    Context::resolve::<T>() / weak_resolve
//! ```
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use bindery_container::builder::AssemblyBuilder;
//! use bindery_container::context::Context;
//! use bindery_container::scope::Scope;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let mut builder = AssemblyBuilder::new();
//! builder.add_factory(Scope::Singleton, || {
//!     Arc::new(Database { url: "postgres://localhost".into() })
//! });
//!
//! let context = Context::new();
//! context.register(builder.build());
//!
//! let db: Arc<Database> = context.resolve().expect("database is registered");
//! assert_eq!(db.url, "postgres://localhost");
//! ```

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::Result;
use crate::identity::Wrapped;
use crate::key::BindingKey;
use crate::registry::{Assembly, downcast_produced};

static GLOBAL_CONTEXT: Lazy<Context> = Lazy::new(Context::new);

/// Thread-safe owner of one live [`Assembly`].
///
/// The process-wide instance is reached through
/// [`Context::global`]; independent instances (tests, embedders that
/// wire a composition root explicitly) come from [`Context::new`].
///
/// All operations are safe for concurrent use. The lock is never held
/// across a factory invocation, so factories may re-enter the same
/// context to resolve their own dependencies. Two threads racing
/// through the first resolve of a singleton may both run the factory;
/// the first stored instance wins and both observe it.
pub struct Context {
    assembly: RwLock<Assembly>,
}

impl Context {
    /// Creates a context with an empty assembly.
    pub fn new() -> Self {
        Self {
            assembly: RwLock::new(Assembly::new()),
        }
    }

    /// Returns the process-wide context, created on first access.
    pub fn global() -> &'static Context {
        &GLOBAL_CONTEXT
    }

    /// Merges a batch into the live assembly.
    ///
    /// Existing bindings for other keys survive; same-key bindings are
    /// replaced by the incoming batch. Returns `self` for chaining.
    pub fn register(&self, assembly: Assembly) -> &Self {
        debug!(incoming = assembly.len(), "Registering assembly");
        self.assembly.write().merge(assembly);
        self
    }

    /// Resolves a value for type `T`.
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.resolve_keyed(BindingKey::make::<T>(None))
    }

    /// Resolves a value for type `T` under a binding name.
    pub fn resolve_named<T: Clone + Send + Sync + 'static>(&self, name: &'static str) -> Result<T> {
        self.resolve_keyed(BindingKey::make::<T>(Some(name)))
    }

    /// Resolves an optional-typed request against the inner type's
    /// binding: `resolve_wrapped::<Option<Arc<X>>>()` hits the entry
    /// registered for `Arc<X>`.
    pub fn resolve_wrapped<W: Wrapped>(&self) -> Result<W> {
        let inner = self.resolve_keyed::<W::Inner>(BindingKey::make_wrapped::<W>(None))?;
        Ok(W::wrap(inner))
    }

    /// Named variant of [`resolve_wrapped`](Context::resolve_wrapped).
    pub fn resolve_named_wrapped<W: Wrapped>(&self, name: &'static str) -> Result<W> {
        let inner = self.resolve_keyed::<W::Inner>(BindingKey::make_wrapped::<W>(Some(name)))?;
        Ok(W::wrap(inner))
    }

    /// Non-owning resolution for a binding registered as `Arc<T>`.
    ///
    /// Resolves, downgrades, drops its own strong handle, then
    /// upgrades: the result is `Some` only while another owner (the
    /// singleton cache, or any consumer still holding the value) keeps
    /// the instance alive, and `None` for a freshly constructed
    /// prototype nobody else holds.
    pub fn weak_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        self.weak_resolve_keyed(BindingKey::make::<Arc<T>>(None))
    }

    /// Named variant of [`weak_resolve`](Context::weak_resolve).
    pub fn weak_resolve_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &'static str,
    ) -> Result<Option<Arc<T>>> {
        self.weak_resolve_keyed(BindingKey::make::<Arc<T>>(Some(name)))
    }

    /// Empties the live assembly. Idempotent.
    pub fn teardown(&self) {
        self.assembly.write().empty();
    }

    fn resolve_keyed<T: Clone + Send + Sync + 'static>(&self, key: BindingKey) -> Result<T> {
        trace!(key = %key, "Resolving through context");

        let (factory, singleton) = {
            let assembly = self.assembly.read();
            if let Some(value) = assembly.cached_instance::<T>(&key)? {
                return Ok(value);
            }
            match assembly.factory(&key) {
                Some(entry) => entry,
                None => return Err(assembly.not_registered(key)),
            }
        };

        // Lock released: the factory may re-enter this context to
        // resolve its own dependencies.
        let produced = factory();

        if singleton {
            self.assembly.write().promote::<T>(key, produced)
        } else {
            downcast_produced::<T>(key, produced)
        }
    }

    fn weak_resolve_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: BindingKey,
    ) -> Result<Option<Arc<T>>> {
        let strong: Arc<T> = self.resolve_keyed(key)?;
        let weak = Arc::downgrade(&strong);
        drop(strong);
        Ok(weak.upgrade())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.assembly.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AssemblyBuilder;
    use crate::error::BinderyError;
    use crate::injectable::BindsTo;
    use crate::scope::Scope;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn leaked() -> &'static Context {
        Box::leak(Box::new(Context::new()))
    }

    #[test]
    fn register_and_resolve() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Prototype, || 42u32);
        context.register(builder.build());

        let value: u32 = context.resolve().unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn register_chaining_merges_batches() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();

        builder.add_factory(Scope::Prototype, || 1u32);
        let first = builder.build();
        builder.add_factory(Scope::Prototype, || String::from("two"));
        let second = builder.build();

        context.register(first).register(second);

        let number: u32 = context.resolve().unwrap();
        let text: String = context.resolve().unwrap();
        assert_eq!(number, 1);
        assert_eq!(text, "two");
    }

    #[test]
    fn later_batch_replaces_same_key_binding() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();

        builder.add_factory(Scope::Prototype, || String::from("old"));
        context.register(builder.build());
        builder.add_factory(Scope::Prototype, || String::from("new"));
        context.register(builder.build());

        let value: String = context.resolve().unwrap();
        assert_eq!(value, "new");
    }

    #[test]
    fn singleton_resolves_to_the_same_instance() {
        let invocations = Arc::new(AtomicU32::new(0));
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Singleton, {
            let invocations = invocations.clone();
            move || {
                invocations.fetch_add(1, Ordering::SeqCst);
                Arc::new(String::from("logger"))
            }
        });
        context.register(builder.build());

        let a: Arc<String> = context.resolve().unwrap();
        let b: Arc<String> = context.resolve().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn teardown_unregisters_everything() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Singleton, || Arc::new(String::from("logger")));
        context.register(builder.build());

        let a: Arc<String> = context.resolve().unwrap();
        let b: Arc<String> = context.resolve().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        context.teardown();
        let result: Result<Arc<String>> = context.resolve();
        assert!(matches!(result, Err(BinderyError::NotRegistered(_))));
    }

    #[test]
    fn named_prototype_factories_stay_distinguishable() {
        struct Engine {
            label: &'static str,
        }

        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder
            .add_named_factory("v1", Scope::Prototype, || Arc::new(Engine { label: "v1" }))
            .add_named_factory("v2", Scope::Prototype, || Arc::new(Engine { label: "v2" }));
        context.register(builder.build());

        let v1: Arc<Engine> = context.resolve_named("v1").unwrap();
        let v2: Arc<Engine> = context.resolve_named("v2").unwrap();
        assert_eq!(v1.label, "v1");
        assert_eq!(v2.label, "v2");
    }

    #[test]
    fn unnamed_and_named_bindings_stay_separate() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder
            .add_factory(Scope::Singleton, || Arc::new(String::from("unnamed")))
            .add_named_factory("alt", Scope::Singleton, || Arc::new(String::from("alt")));
        context.register(builder.build());

        let unnamed: Arc<String> = context.resolve().unwrap();
        let named: Arc<String> = context.resolve_named("alt").unwrap();
        assert_eq!(unnamed.as_str(), "unnamed");
        assert_eq!(named.as_str(), "alt");
        assert!(!Arc::ptr_eq(&unnamed, &named));
    }

    #[test]
    fn trait_binding_resolves_through_no_arg_constructor() {
        #[derive(Default)]
        struct SilentAlarm;

        trait Alarm: Send + Sync {
            fn armed(&self) -> bool;
        }

        impl Alarm for SilentAlarm {
            fn armed(&self) -> bool {
                true
            }
        }

        impl BindsTo<dyn Alarm> for SilentAlarm {
            fn upcast(this: Arc<Self>) -> Arc<dyn Alarm> {
                this
            }
        }

        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_injectable_as::<SilentAlarm, dyn Alarm>(Scope::Singleton);
        context.register(builder.build());

        let alarm: Arc<dyn Alarm> = context.resolve().unwrap();
        assert!(alarm.armed());
    }

    #[test]
    fn wrapped_resolution_reaches_the_unwrapped_binding() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder
            .add_factory(Scope::Singleton, || Arc::new(String::from("present")))
            .add_named_factory("alt", Scope::Singleton, || Arc::new(String::from("alt")));
        context.register(builder.build());

        let wrapped: Option<Arc<String>> = context.resolve_wrapped().unwrap();
        assert_eq!(wrapped.as_deref().map(String::as_str), Some("present"));

        let named: Option<Arc<String>> = context.resolve_named_wrapped("alt").unwrap();
        assert_eq!(named.as_deref().map(String::as_str), Some("alt"));
    }

    #[test]
    fn weak_resolve_observes_singleton_liveness() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Singleton, || Arc::new(String::from("kept alive")));
        context.register(builder.build());

        // The instance cache owns the singleton, so the observation
        // finds a live value.
        let observed = context.weak_resolve::<String>().unwrap();
        assert_eq!(observed.as_deref().map(String::as_str), Some("kept alive"));
    }

    #[test]
    fn weak_resolve_of_prototype_is_absent() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Prototype, || Arc::new(String::from("ephemeral")));
        context.register(builder.build());

        // Nobody else owns a fresh prototype, so there is nothing to
        // observe.
        let observed = context.weak_resolve::<String>().unwrap();
        assert!(observed.is_none());
    }

    #[test]
    fn weak_resolve_works_for_trait_bindings() {
        #[derive(Default)]
        struct WallClock;

        trait Clock: Send + Sync {
            fn now(&self) -> u64;
        }

        impl Clock for WallClock {
            fn now(&self) -> u64 {
                0
            }
        }

        impl BindsTo<dyn Clock> for WallClock {
            fn upcast(this: Arc<Self>) -> Arc<dyn Clock> {
                this
            }
        }

        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder.add_injectable_as::<WallClock, dyn Clock>(Scope::Singleton);
        context.register(builder.build());

        let observed = context.weak_resolve::<dyn Clock>().unwrap();
        assert_eq!(observed.map(|clock| clock.now()), Some(0));
    }

    #[test]
    fn weak_resolve_of_unregistered_is_an_error() {
        let context = Context::new();
        let result = context.weak_resolve::<String>();
        assert!(matches!(result, Err(BinderyError::NotRegistered(_))));
    }

    #[test]
    fn factories_may_reenter_the_context() {
        struct Config {
            url: String,
        }
        struct Repository {
            config: Arc<Config>,
        }

        let context = leaked();
        let mut builder = AssemblyBuilder::new();
        builder
            .add_factory(Scope::Singleton, || {
                Arc::new(Config { url: "memory://".into() })
            })
            .add_factory(Scope::Prototype, move || {
                let config: Arc<Config> = context.resolve().expect("config is registered");
                Arc::new(Repository { config })
            });
        context.register(builder.build());

        let repository: Arc<Repository> = context.resolve().unwrap();
        assert_eq!(repository.config.url, "memory://");
    }

    #[test]
    fn concurrent_first_resolves_converge_on_one_instance() {
        let context = leaked();
        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Singleton, || Arc::new(String::from("raced")));
        context.register(builder.build());

        let barrier = Barrier::new(4);
        let resolved: Vec<Arc<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        context.resolve::<Arc<String>>().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        for value in &resolved[1..] {
            assert!(Arc::ptr_eq(&resolved[0], value));
        }
    }

    #[test]
    fn global_context_is_shared() {
        #[derive(Clone)]
        struct GlobalMarker(u8);

        let mut builder = AssemblyBuilder::new();
        builder.add_factory(Scope::Prototype, || GlobalMarker(7));
        Context::global().register(builder.build());

        let marker: GlobalMarker = Context::global().resolve().unwrap();
        assert_eq!(marker.0, 7);
    }

    #[test]
    fn debug_reports_binding_count() {
        let context = Context::new();
        let mut builder = AssemblyBuilder::new();
        builder
            .add_factory(Scope::Prototype, || 1u32)
            .add_factory(Scope::Prototype, || String::from("x"));
        context.register(builder.build());

        let rendered = format!("{context:?}");
        assert!(rendered.contains("Context"));
        assert!(rendered.contains('2'));
    }
}
