//! Core trait for genotype instances.

use super::hierarchy::Variant;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a genotype instance.
///
/// Stateful selectors key their per-instance state on this value, so two
/// distinct instances must never share an id while both are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenotypeId(u64);

impl GenotypeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocates a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A candidate-solution representation that operators act on.
///
/// The dispatcher never looks inside a genotype; it only needs its runtime
/// variant and its identity. Custom predicates receive the full value.
///
/// # Implementing
///
/// ```ignore
/// struct BitString {
///     id: GenotypeId,
///     bits: Vec<bool>,
/// }
///
/// impl Genotype for BitString {
///     fn variant(&self) -> Variant { BIT_STRING }
///     fn id(&self) -> GenotypeId { self.id }
/// }
/// ```
pub trait Genotype: Send + Sync {
    /// The runtime variant of this instance.
    fn variant(&self) -> Variant;

    /// The identity of this instance.
    fn id(&self) -> GenotypeId;
}
