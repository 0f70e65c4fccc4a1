//! Operator selection strategies.
//!
//! When more than one operator of the same kind applies to a genotype, the
//! dispatcher delegates the final pick to an [`OperatorSelector`]
//! registered for the `(variant, kind)` pair.
//!
//! # Built-in Selectors
//!
//! - [`RandomSelector`]: uniform draw from a shared seeded RNG
//! - [`RoundRobinSelector`]: position remembered per genotype instance

mod config;
mod random;
mod round_robin;
mod types;

pub use config::{RoundRobinMode, SelectorStrategy};
pub use random::RandomSelector;
pub use round_robin::RoundRobinSelector;
pub use types::{OperatorSelector, SelectorKey};
