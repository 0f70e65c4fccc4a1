//! Selector strategies that can be chosen from configuration.

use super::random::RandomSelector;
use super::round_robin::RoundRobinSelector;
use super::types::OperatorSelector;
use crate::genotype::Genotype;
use std::sync::Arc;

/// How a [`RoundRobinSelector`] treats its stored position after selecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundRobinMode {
    /// Store the selected position unchanged.
    #[default]
    Sticky,

    /// Store the following position (modulo the candidate count).
    Advancing,
}

/// A built-in selector strategy.
///
/// # Examples
///
/// ```
/// use u_genop::selection::SelectorStrategy;
///
/// let strategy = SelectorStrategy::RoundRobin;
/// assert!(strategy.is_some());
/// assert!(!SelectorStrategy::None.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectorStrategy {
    /// No selector: ambiguous resolutions fail.
    #[default]
    None,

    /// [`RandomSelector`].
    Random,

    /// [`RoundRobinSelector`].
    RoundRobin,
}

impl SelectorStrategy {
    pub fn is_some(self) -> bool {
        !matches!(self, SelectorStrategy::None)
    }

    /// Instantiates the strategy, or `None` for [`SelectorStrategy::None`].
    pub fn build<G, O>(
        self,
        seed: Option<u64>,
        mode: RoundRobinMode,
    ) -> Option<Arc<dyn OperatorSelector<G, O>>>
    where
        G: Genotype + ?Sized + 'static,
        O: ?Sized + 'static,
    {
        match self {
            SelectorStrategy::None => None,
            SelectorStrategy::Random => {
                Some(Arc::new(RandomSelector::from_seed(seed)) as Arc<dyn OperatorSelector<G, O>>)
            }
            SelectorStrategy::RoundRobin => {
                Some(Arc::new(RoundRobinSelector::with_mode(mode)) as Arc<dyn OperatorSelector<G, O>>)
            }
        }
    }
}
