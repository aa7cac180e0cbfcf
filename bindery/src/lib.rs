//! # Bindery — a lifecycle-aware dependency binding registry for Rust
//!
//! Bindery maps type identities (optionally qualified by a binding
//! name) to construction strategies, and resolves requests into
//! instances according to a declared lifecycle: a fresh instance per
//! request ([`Scope::Prototype`]) or one cached instance built on
//! first use ([`Scope::Singleton`]).
//!
//! Batches of bindings are staged with an [`AssemblyBuilder`], merged
//! into a [`Context`], and resolved by type — see the crate example in
//! `examples/basic.rs`.

pub use bindery_container::*;
pub use bindery_support::*;
