//! Core trait for operator selectors.

use crate::genotype::Variant;
use crate::operator::OperatorKind;
use std::sync::Arc;

/// Picks one operator out of several that apply equally to a genotype.
///
/// Implementations return the *index* of the chosen candidate, so the
/// result is a member of `candidates` by construction. Returning `None`
/// (or an out-of-range index) is reported to the caller of
/// [`resolve`](crate::dispatch::OperatorDispatcher::resolve) as an
/// incompatibility error.
///
/// Selectors are shared across worker threads and must tolerate
/// concurrent calls for the same or different genotypes.
pub trait OperatorSelector<G: ?Sized, O: ?Sized>: Send + Sync {
    /// Returns a human-readable name for this selector.
    fn name(&self) -> &str;

    /// Chooses one of `candidates` (never empty) for `genotype`.
    fn select(&self, candidates: &[Arc<O>], genotype: &G) -> Option<usize>;
}

/// Key under which a selector is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorKey {
    pub variant: Variant,
    pub kind: OperatorKind,
}

impl SelectorKey {
    pub fn new(variant: Variant, kind: OperatorKind) -> Self {
        Self { variant, kind }
    }
}
