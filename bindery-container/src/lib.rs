//! Core container implementation for Bindery.
//!
//! The pieces, leaf to root: [`identity`] derives stable type
//! identities (with optional-wrapper collapsing), [`key`] pairs them
//! with optional binding names, [`registry`] holds batches of bindings
//! and runs the resolution algorithm, [`builder`] stages batches
//! fluently, and [`context`] is the process-wide resolution point.

pub mod builder;
pub mod context;
pub mod error;
pub mod identity;
pub mod injectable;
pub mod key;
pub mod registry;
pub mod scope;

pub use builder::AssemblyBuilder;
pub use context::Context;
pub use error::{BinderyError, Result};
pub use identity::{TypeIdentity, Wrapped};
pub use injectable::{BindsTo, Injectable};
pub use key::BindingKey;
pub use registry::Assembly;
pub use scope::Scope;

pub mod prelude {
    //! One-stop imports for registering and resolving bindings.
    pub use crate::builder::AssemblyBuilder;
    pub use crate::context::Context;
    pub use crate::error::{BinderyError, Result};
    pub use crate::injectable::{BindsTo, Injectable};
    pub use crate::key::BindingKey;
    pub use crate::registry::Assembly;
    pub use crate::scope::Scope;
}
