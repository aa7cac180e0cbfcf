//! # Bindery Support
//!
//! Shared utilities for the Bindery binding registry.
//!
//! This crate provides text rendering for error messages: type-name
//! shortening and "did you mean?" candidate scoring.

pub mod rendering;
