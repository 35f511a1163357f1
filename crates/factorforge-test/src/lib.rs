//! Shared test fixtures for FactorForge crates.
//!
//! This crate provides variables, domains and tensors for testing.
//! It depends on `factorforge-core` only, so `factorforge-model` can use it
//! as a dev-dependency without a cycle.
//!
//! - [`chain`] - linear chains of discrete state variables
//! - [`tagging`] - word/tag sentences over categorical domains
//! - [`numeric`] - weight tensors and float comparison
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! factorforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use factorforge_test::chain::StateChain;
//! use factorforge_test::numeric::{assert_close, identity_transitions};
//! ```

pub mod chain;
pub mod numeric;
pub mod tagging;

// Re-export commonly used types at crate root for convenience
pub use chain::StateChain;
pub use numeric::{assert_close, identity_transitions};
pub use tagging::TaggedSentence;
