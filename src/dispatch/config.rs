//! Dispatcher configuration.

use crate::genotype::Genotype;
use crate::selection::{OperatorSelector, RoundRobinMode, SelectorStrategy};
use std::sync::Arc;

/// Configuration for an [`OperatorDispatcher`](super::OperatorDispatcher).
///
/// # Fallback Selector
///
/// `default_strategy` names a selector used for every `(variant, kind)`
/// pair that has no selector of its own, and only when more than one
/// operator applies. With the default [`SelectorStrategy::None`], an
/// ambiguous resolution without a registered selector is an error.
///
/// # Examples
///
/// ```
/// use u_genop::dispatch::DispatchConfig;
/// use u_genop::selection::{RoundRobinMode, SelectorStrategy};
///
/// let config = DispatchConfig::default()
///     .with_default_strategy(SelectorStrategy::RoundRobin)
///     .with_round_robin_mode(RoundRobinMode::Advancing)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Whether [`resolve_batch`](super::OperatorDispatcher::resolve_batch)
    /// resolves in parallel using rayon (requires the `parallel` feature).
    pub parallel: bool,

    /// Minimum batch size before a batch is resolved in parallel.
    pub parallel_threshold: usize,

    /// Fallback selector for ambiguous resolutions.
    pub default_strategy: SelectorStrategy,

    /// Position handling of a round-robin fallback selector.
    pub round_robin_mode: RoundRobinMode,

    /// Random seed for a random fallback selector.
    pub seed: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64,
            default_strategy: SelectorStrategy::None,
            round_robin_mode: RoundRobinMode::Sticky,
            seed: None,
        }
    }
}

impl DispatchConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_threshold(mut self, n: usize) -> Self {
        self.parallel_threshold = n;
        self
    }

    pub fn with_default_strategy(mut self, strategy: SelectorStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn with_round_robin_mode(mut self, mode: RoundRobinMode) -> Self {
        self.round_robin_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be positive".into());
        }
        if self.seed.is_some() && self.default_strategy != SelectorStrategy::Random {
            return Err(format!(
                "seed only applies to the Random strategy, got {:?}",
                self.default_strategy
            ));
        }
        Ok(())
    }

    /// Instantiates the fallback selector, if any.
    pub fn build_selector<G, O>(&self) -> Option<Arc<dyn OperatorSelector<G, O>>>
    where
        G: Genotype + ?Sized + 'static,
        O: ?Sized + 'static,
    {
        self.default_strategy
            .build(self.seed, self.round_robin_mode)
    }
}
