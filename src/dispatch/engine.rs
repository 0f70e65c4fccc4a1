//! Resolution engine.

use super::config::DispatchConfig;
use super::directory::{self, check_variant, OperatorList, Registrations};
use super::wiring::Wiring;
use crate::error::{DispatchError, Result};
use crate::genotype::{Genotype, GenotypeHierarchy, Variant};
use crate::operator::{derive_target, Operator, OperatorKind, OperatorPredicate, OperatorType};
use crate::selection::{OperatorSelector, SelectorKey};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace, warn};

/// Cache counters of a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// Lookups answered by an exact registration or a memoized entry.
    pub hits: u64,

    /// Lookups that evaluated predicates and scanned ancestors.
    pub misses: u64,

    /// Variants with a memoized candidate set.
    pub memoized: usize,

    /// Variants with at least one explicitly registered operator.
    pub registered_variants: usize,

    /// Custom predicates in the predicate table.
    pub predicates: usize,
}

/// Routes genotypes to the operators of one kind.
///
/// A dispatcher starts *unbuilt*. The first [`inject`](Self::inject)
/// instantiates the default operator types, merges them with the wiring's
/// bindings and publishes the directory; from then on the directory only
/// grows, through [`add_operator`](Self::add_operator) and through
/// memoization of resolved variants.
///
/// # Resolution
///
/// For a genotype of variant `V`:
///
/// 1. The composite variant resolves to `None`.
/// 2. Operators registered for exactly `V`, or memoized for `V`, are the
///    candidates.
/// 3. Otherwise the candidates are the operators of every custom predicate
///    that holds, followed by the operators of every registered proper
///    ancestor of `V` (most specific first). The result is memoized under `V`.
/// 4. A single candidate with no selector registered is returned directly;
///    several candidates require a selector for `(V, kind)`.
///
/// Memoized entries are never invalidated: operators registered for an
/// ancestor after `V` was resolved are not seen by `V`. Operators registered
/// for `V` itself are added to its memoized candidates.
///
/// # Examples
///
/// ```ignore
/// let dispatcher: OperatorDispatcher<MyGenotype, dyn Mutate> =
///     OperatorDispatcher::new(OperatorKind::MUTATE, hierarchy, vec![OperatorType::new("BitFlip")]);
/// dispatcher.inject(&wiring)?;
///
/// if let Some(op) = dispatcher.resolve(&genotype)? {
///     op.mutate(&mut genotype, 0.1);
/// }
/// ```
pub struct OperatorDispatcher<G: ?Sized, O: ?Sized> {
    kind: OperatorKind,
    hierarchy: Arc<GenotypeHierarchy>,
    defaults: Vec<OperatorType>,
    config: DispatchConfig,
    built: OnceLock<()>,
    write_lock: Mutex<()>,
    registrations: ArcSwap<Registrations<G, O>>,
    memo: DashMap<Variant, OperatorList<O>>,
    selectors: DashMap<SelectorKey, Arc<dyn OperatorSelector<G, O>>>,
    fallback: Option<Arc<dyn OperatorSelector<G, O>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<G, O> OperatorDispatcher<G, O>
where
    G: Genotype + ?Sized + 'static,
    O: Operator + ?Sized + 'static,
{
    /// Creates an unbuilt dispatcher for operators of `kind`.
    pub fn new(kind: OperatorKind, hierarchy: Arc<GenotypeHierarchy>, defaults: Vec<OperatorType>) -> Self {
        Self {
            kind,
            hierarchy,
            defaults,
            config: DispatchConfig::default(),
            built: OnceLock::new(),
            write_lock: Mutex::new(()),
            registrations: ArcSwap::from_pointee(Registrations::new()),
            memo: DashMap::new(),
            selectors: DashMap::new(),
            fallback: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Applies a configuration.
    pub fn with_config(mut self, config: DispatchConfig) -> Result<Self> {
        config.validate().map_err(DispatchError::InvalidConfig)?;
        self.fallback = config.build_selector();
        self.config = config;
        Ok(self)
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn hierarchy(&self) -> &GenotypeHierarchy {
        &self.hierarchy
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }

    /// Builds the directory on the first call and registers the wiring's
    /// selectors on every call.
    ///
    /// A failed build leaves the dispatcher unbuilt.
    pub fn inject(&self, wiring: &Wiring<G, O>) -> Result<()> {
        if !self.is_built() {
            let _guard = self.write_lock.lock();
            if !self.is_built() {
                let current = self.registrations.load_full();
                let next = directory::build(&self.hierarchy, &self.defaults, wiring, &current)?;
                self.registrations.store(Arc::new(next));
                let _ = self.built.set(());
                debug!(kind = %self.kind, "dispatcher built");
            }
        }

        for (key, selector) in wiring.selectors() {
            self.selectors.insert(*key, Arc::clone(selector));
        }
        Ok(())
    }

    /// Registers one more operator under `predicate`.
    ///
    /// Variant predicates go to the variant table, custom predicates to the
    /// predicate table; the void predicate is replaced by the operator's
    /// target. A variant resolved earlier keeps its memoized candidates: they
    /// become the start of its explicit entry. Memoized entries of other
    /// variants are left untouched.
    pub fn add_operator(&self, predicate: OperatorPredicate<G>, operator: Arc<O>) -> Result<()> {
        let target = derive_target(operator.as_ref(), &self.hierarchy)?;
        let operators = [operator];

        let _guard = self.write_lock.lock();
        let mut next = Registrations::clone(&self.registrations.load());
        match predicate {
            OperatorPredicate::Void => self.register_variant(&mut next, target, &operators),
            OperatorPredicate::Variant(variant) => {
                check_variant(&self.hierarchy, variant, &operators)?;
                self.register_variant(&mut next, variant, &operators);
            }
            OperatorPredicate::Custom(custom) => next.insert_predicate(custom, &operators),
        }
        self.registrations.store(Arc::new(next));
        Ok(())
    }

    /// Registers or replaces the selector for `key`.
    pub fn add_operator_selector(&self, key: SelectorKey, selector: Arc<dyn OperatorSelector<G, O>>) {
        self.selectors.insert(key, selector);
    }

    /// Resolves the operator that acts on `genotype`.
    ///
    /// Returns `Ok(None)` for the composite variant.
    pub fn resolve(&self, genotype: &G) -> Result<Option<Arc<O>>> {
        let variant = genotype.variant();
        if self.hierarchy.is_composite(variant) {
            return Ok(None);
        }
        let candidates = self.candidates(genotype);
        self.select(&candidates, genotype).map(Some)
    }

    /// Resolves a batch of genotypes, in parallel when configured.
    pub fn resolve_batch(&self, genotypes: &[&G]) -> Vec<Result<Option<Arc<O>>>> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel && genotypes.len() >= self.config.parallel_threshold {
                use rayon::prelude::*;
                return genotypes.par_iter().map(|g| self.resolve(g)).collect();
            }
        }

        genotypes.iter().map(|g| self.resolve(g)).collect()
    }

    /// Every operator currently known, each instance once.
    ///
    /// Registered operators come first, most specific variant first, then
    /// predicate operators in registration order, then memoized ones.
    pub fn all_registered_operators(&self) -> Vec<Arc<O>> {
        let registrations = self.registrations.load();
        let memoized: Vec<OperatorList<O>> = self.memo.iter().map(|e| Arc::clone(e.value())).collect();

        let mut seen = HashSet::new();
        let mut all = Vec::new();
        let candidates = registrations
            .operators()
            .chain(memoized.iter().flat_map(|list| list.iter()));
        for operator in candidates {
            if seen.insert(Arc::as_ptr(operator) as *const ()) {
                all.push(Arc::clone(operator));
            }
        }
        all
    }

    pub fn stats(&self) -> DispatchStats {
        let registrations = self.registrations.load();
        DispatchStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            memoized: self.memo.len(),
            registered_variants: registrations.operable_variants(),
            predicates: registrations.predicates.len(),
        }
    }

    fn register_variant(&self, registrations: &mut Registrations<G, O>, variant: Variant, operators: &[Arc<O>]) {
        if registrations.exact(&self.hierarchy, variant).is_none() {
            if let Some(memoized) = self.memo.get(&variant) {
                registrations.insert_variant(&self.hierarchy, variant, memoized.value());
            }
        }
        registrations.insert_variant(&self.hierarchy, variant, operators);
    }

    /// Candidate operators for `genotype`, memoizing cache misses.
    fn candidates(&self, genotype: &G) -> OperatorList<O> {
        let variant = genotype.variant();
        let registrations = self.registrations.load();

        if let Some(exact) = registrations.exact(&self.hierarchy, variant) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(exact);
        }
        if let Some(memoized) = self.memo.get(&variant) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(memoized.value());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut found: Vec<Arc<O>> = Vec::new();
        for (predicate, operators) in &registrations.predicates {
            if predicate.test(genotype) {
                found.extend(operators.iter().cloned());
            }
        }
        for entry in registrations.variants.values() {
            if !entry.operators.is_empty() && self.hierarchy.is_proper_ancestor(entry.variant, variant) {
                found.extend(entry.operators.iter().cloned());
            }
        }

        let found: OperatorList<O> = found.into();
        if found.is_empty() {
            return found;
        }
        // Concurrent misses for the same variant compute equal lists; the first insert wins.
        let stored = Arc::clone(self.memo.entry(variant).or_insert(found).value());
        trace!(
            kind = %self.kind,
            variant = self.hierarchy.name(variant),
            candidates = stored.len(),
            "memoized candidate operators"
        );
        stored
    }

    fn select(&self, candidates: &OperatorList<O>, genotype: &G) -> Result<Arc<O>> {
        let variant = genotype.variant();
        let Some(first) = candidates.first() else {
            return Err(DispatchError::NoApplicableOperator {
                variant: self.hierarchy.name(variant).to_string(),
                kind: self.kind.to_string(),
            });
        };

        let key = SelectorKey::new(variant, first.kind());
        let registered = self.selectors.get(&key).map(|s| Arc::clone(s.value()));
        let selector = match registered {
            Some(selector) => selector,
            None if candidates.len() == 1 => return Ok(Arc::clone(first)),
            None => match &self.fallback {
                Some(fallback) => Arc::clone(fallback),
                None => {
                    return Err(DispatchError::SelectorRequired {
                        variant: self.hierarchy.name(variant).to_string(),
                        kind: key.kind.to_string(),
                        candidates: candidates.len(),
                    })
                }
            },
        };

        let index = selector.select(candidates, genotype);
        match index.and_then(|i| candidates.get(i)) {
            Some(operator) => Ok(Arc::clone(operator)),
            None => {
                warn!(
                    selector = selector.name(),
                    variant = self.hierarchy.name(variant),
                    ?index,
                    candidates = candidates.len(),
                    "operator selector declined"
                );
                Err(DispatchError::SelectorDeclined {
                    variant: self.hierarchy.name(variant).to_string(),
                    kind: key.kind.to_string(),
                    index,
                    candidates: candidates.len(),
                })
            }
        }
    }
}
