//! Operator dispatch over a genotype hierarchy.
//!
//! An [`OperatorDispatcher`] owns the operator directory for one operator
//! kind: a variant table iterated from most to least specific variant, and
//! a predicate table of custom applicability tests. It resolves a genotype
//! to one operator by exact lookup, memoized lookup, or predicate and
//! ancestor search, and defers ties to an
//! [`OperatorSelector`](crate::selection::OperatorSelector).
//!
//! # Key Types
//!
//! - [`OperatorDispatcher`]: the resolution engine
//! - [`Wiring`]: bindings and selectors supplied by the bootstrap layer
//! - [`DispatchConfig`]: parallelism and fallback selector settings
//!
//! # Concurrency
//!
//! The directory is built once under a mutex. Afterwards, registrations are
//! published as immutable snapshots and memoized candidate sets live in a
//! concurrent map with insert-if-absent semantics, so `resolve` never waits
//! on a lock held across a resolution.

mod config;
mod directory;
mod engine;
mod wiring;

pub use config::DispatchConfig;
pub use engine::{DispatchStats, OperatorDispatcher};
pub use wiring::Wiring;
