//! Injectable types — bindings constructed without a caller-supplied
//! factory.
//!
//! A type registered "by injectable" is built from its no-argument
//! constructor, which in Rust is [`Default`]. Trait bindings for
//! injectables additionally carry the unsized coercion through
//! [`BindsTo`], since a generic registration method cannot coerce
//! `Arc<T>` to `Arc<dyn I>` on stable Rust.

use std::sync::Arc;

/// A type the assembly can construct on its own.
///
/// Blanket-implemented for every `Default` type, so deriving or
/// implementing `Default` is all a service needs to be registered
/// without a factory closure.
pub trait Injectable: Send + Sync + 'static {
    /// Builds a fresh instance.
    fn construct() -> Self;
}

impl<T: Default + Send + Sync + 'static> Injectable for T {
    fn construct() -> Self {
        T::default()
    }
}

/// Projects a concrete injectable onto the trait object it is bound
/// to.
///
/// The implementation is a one-liner: the `Arc<Self>` to `Arc<I>`
/// coercion compiles at the concrete impl site.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use bindery_container::injectable::BindsTo;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct EnglishGreeter;
///
/// impl Greeter for EnglishGreeter {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// impl BindsTo<dyn Greeter> for EnglishGreeter {
///     fn upcast(this: Arc<Self>) -> Arc<dyn Greeter> {
///         this
///     }
/// }
/// ```
pub trait BindsTo<I: ?Sized + Send + Sync + 'static>: Injectable + Sized {
    /// Converts the concrete instance into its bound trait object.
    fn upcast(this: Arc<Self>) -> Arc<I>;
}
