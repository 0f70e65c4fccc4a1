//! Operator associations supplied by the bootstrap layer.

use crate::operator::{OperatorFactory, OperatorPredicate, TypeRegistry};
use crate::selection::{OperatorSelector, SelectorKey};
use std::sync::Arc;

/// Everything the bootstrap layer hands to a dispatcher on
/// [`inject`](super::OperatorDispatcher::inject).
///
/// - a factory that instantiates the dispatcher's default operator types,
/// - single bindings `predicate -> operator` (one per predicate; a later
///   binding for the same predicate replaces the earlier one),
/// - multi bindings `predicate -> [operator]` (accumulating),
/// - selector bindings `(variant, kind) -> selector`.
///
/// When a predicate has both a single and a multi binding, the multi
/// binding wins.
///
/// The void predicate only means "keyed by the operator's target later":
/// void bindings never replace each other and every one of them is kept.
pub struct Wiring<G: ?Sized, O: ?Sized> {
    factory: Arc<dyn OperatorFactory<O>>,
    singles: Vec<(OperatorPredicate<G>, Arc<O>)>,
    multis: Vec<(OperatorPredicate<G>, Vec<Arc<O>>)>,
    selectors: Vec<(SelectorKey, Arc<dyn OperatorSelector<G, O>>)>,
}

impl<G: ?Sized, O: ?Sized + 'static> Wiring<G, O> {
    pub fn new(factory: Arc<dyn OperatorFactory<O>>) -> Self {
        Self {
            factory,
            singles: Vec::new(),
            multis: Vec::new(),
            selectors: Vec::new(),
        }
    }

    /// Wiring whose factory knows no operator types.
    pub fn empty() -> Self {
        Self::new(Arc::new(TypeRegistry::<O>::new()))
    }

    /// Binds a single operator to `predicate`.
    pub fn bind(mut self, predicate: OperatorPredicate<G>, operator: Arc<O>) -> Self {
        if predicate.is_void() {
            self.singles.push((predicate, operator));
            return self;
        }
        match self.singles.iter_mut().find(|(p, _)| *p == predicate) {
            Some((_, existing)) => *existing = operator,
            None => self.singles.push((predicate, operator)),
        }
        self
    }

    /// Adds operators to the set bound to `predicate`.
    pub fn bind_all<I>(mut self, predicate: OperatorPredicate<G>, operators: I) -> Self
    where
        I: IntoIterator<Item = Arc<O>>,
    {
        match self.multis.iter_mut().find(|(p, _)| *p == predicate) {
            Some((_, existing)) => existing.extend(operators),
            None => self.multis.push((predicate, operators.into_iter().collect())),
        }
        self
    }

    /// Registers a selector for `key`.
    pub fn bind_selector(mut self, key: SelectorKey, selector: Arc<dyn OperatorSelector<G, O>>) -> Self {
        self.selectors.retain(|(k, _)| *k != key);
        self.selectors.push((key, selector));
        self
    }

    pub fn factory(&self) -> &dyn OperatorFactory<O> {
        self.factory.as_ref()
    }

    pub fn singles(&self) -> &[(OperatorPredicate<G>, Arc<O>)] {
        &self.singles
    }

    pub fn multis(&self) -> &[(OperatorPredicate<G>, Vec<Arc<O>>)] {
        &self.multis
    }

    pub fn selectors(&self) -> &[(SelectorKey, Arc<dyn OperatorSelector<G, O>>)] {
        &self.selectors
    }
}
