//! Operator directory: the variant table and the predicate table.

use super::wiring::Wiring;
use crate::error::{DispatchError, Result};
use crate::genotype::{Genotype, GenotypeHierarchy, Variant};
use crate::operator::{derive_target, CustomPredicate, Operator, OperatorPredicate, OperatorType};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Candidate operators, shared between the tables and callers.
pub(crate) type OperatorList<O> = Arc<[Arc<O>]>;

pub(crate) struct VariantEntry<O: ?Sized> {
    pub(crate) variant: Variant,
    pub(crate) operators: OperatorList<O>,
}

impl<O: ?Sized> Clone for VariantEntry<O> {
    fn clone(&self) -> Self {
        Self {
            variant: self.variant,
            operators: Arc::clone(&self.operators),
        }
    }
}

/// Explicit registrations, published as an immutable snapshot.
///
/// Variant entries are keyed by specificity rank, so iteration visits the
/// most specific variant first. Predicate entries keep registration order.
pub(crate) struct Registrations<G: ?Sized, O: ?Sized> {
    pub(crate) variants: BTreeMap<u32, VariantEntry<O>>,
    pub(crate) predicates: Vec<(CustomPredicate<G>, OperatorList<O>)>,
}

impl<G: ?Sized, O: ?Sized> Clone for Registrations<G, O> {
    fn clone(&self) -> Self {
        Self {
            variants: self.variants.clone(),
            predicates: self.predicates.clone(),
        }
    }
}

impl<G: ?Sized, O: ?Sized> Registrations<G, O> {
    pub(crate) fn new() -> Self {
        Self {
            variants: BTreeMap::new(),
            predicates: Vec::new(),
        }
    }

    /// Operators registered for exactly `variant`.
    pub(crate) fn exact(&self, hierarchy: &GenotypeHierarchy, variant: Variant) -> Option<&OperatorList<O>> {
        self.variants
            .get(&hierarchy.specificity_rank(variant))
            .filter(|e| e.variant == variant)
            .map(|e| &e.operators)
    }

    pub(crate) fn insert_variant(&mut self, hierarchy: &GenotypeHierarchy, variant: Variant, operators: &[Arc<O>]) {
        let entry = self
            .variants
            .entry(hierarchy.specificity_rank(variant))
            .or_insert_with(|| VariantEntry {
                variant,
                operators: Arc::from(Vec::new()),
            });
        if !operators.is_empty() {
            let mut merged = entry.operators.to_vec();
            merged.extend(operators.iter().cloned());
            entry.operators = merged.into();
        }
    }

    pub(crate) fn insert_predicate(&mut self, predicate: CustomPredicate<G>, operators: &[Arc<O>]) {
        match self.predicates.iter_mut().find(|(p, _)| *p == predicate) {
            Some((_, existing)) => {
                let mut merged = existing.to_vec();
                merged.extend(operators.iter().cloned());
                *existing = merged.into();
            }
            None => self.predicates.push((predicate, operators.to_vec().into())),
        }
    }

    /// Iterates every operator in the tables, duplicates included.
    pub(crate) fn operators(&self) -> impl Iterator<Item = &Arc<O>> {
        self.variants
            .values()
            .flat_map(|e| e.operators.iter())
            .chain(self.predicates.iter().flat_map(|(_, ops)| ops.iter()))
    }

    /// Number of variant entries that carry at least one operator.
    pub(crate) fn operable_variants(&self) -> usize {
        self.variants
            .values()
            .filter(|e| !e.operators.is_empty())
            .count()
    }
}

/// Working multimap used while the directory is assembled.
struct Associations<G: ?Sized, O: ?Sized> {
    entries: Vec<(OperatorPredicate<G>, Vec<Arc<O>>)>,
}

impl<G: ?Sized, O: ?Sized> Associations<G, O> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn slot(&mut self, predicate: OperatorPredicate<G>) -> &mut Vec<Arc<O>> {
        let index = match self.entries.iter().position(|(p, _)| *p == predicate) {
            Some(index) => index,
            None => {
                self.entries.push((predicate, Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

/// Builds the directory from the default operator types and the wiring.
///
/// `base` holds registrations made before the build; the result extends it.
///
/// 1. Merge multi bindings, then single bindings whose predicate has no multi
///    binding. Void singles are always merged.
/// 2. Instantiate the default types and file them under the void predicate.
/// 3. Re-key void entries by each operator's target variant.
/// 4. Split variant keys into the variant table, custom keys into the predicate table.
/// 5. Insert the empty composite entry.
pub(crate) fn build<G, O>(
    hierarchy: &GenotypeHierarchy,
    defaults: &[OperatorType],
    wiring: &Wiring<G, O>,
    base: &Registrations<G, O>,
) -> Result<Registrations<G, O>>
where
    G: Genotype + ?Sized,
    O: Operator + ?Sized + 'static,
{
    let mut merged = Associations::new();
    for (predicate, operators) in wiring.multis() {
        merged.slot(predicate.clone()).extend(operators.iter().cloned());
    }
    for (predicate, operator) in wiring.singles() {
        let shadowed = !predicate.is_void() && wiring.multis().iter().any(|(p, _)| p == predicate);
        if !shadowed {
            merged.slot(predicate.clone()).push(Arc::clone(operator));
        }
    }

    for ty in defaults {
        let operator = wiring.factory().instantiate(ty)?;
        merged.slot(OperatorPredicate::Void).push(operator);
    }

    let mut resolved = Associations::new();
    for (predicate, operators) in merged.entries {
        for operator in operators {
            let target = derive_target(operator.as_ref(), hierarchy)?;
            let key = match &predicate {
                OperatorPredicate::Void => OperatorPredicate::Variant(target),
                other => other.clone(),
            };
            resolved.slot(key).push(operator);
        }
    }

    let mut registrations = base.clone();
    for (predicate, operators) in resolved.entries {
        match predicate {
            OperatorPredicate::Variant(variant) => {
                check_variant(hierarchy, variant, &operators)?;
                registrations.insert_variant(hierarchy, variant, &operators);
            }
            OperatorPredicate::Custom(custom) => registrations.insert_predicate(custom, &operators),
            OperatorPredicate::Void => unreachable!("void predicates are re-keyed above"),
        }
    }
    registrations.insert_variant(hierarchy, hierarchy.composite(), &[]);

    debug!(
        defaults = defaults.len(),
        variants = registrations.operable_variants(),
        predicates = registrations.predicates.len(),
        "operator directory built"
    );
    Ok(registrations)
}

/// Rejects variant keys outside the hierarchy and the composite variant.
pub(crate) fn check_variant<O: Operator + ?Sized>(
    hierarchy: &GenotypeHierarchy,
    variant: Variant,
    operators: &[Arc<O>],
) -> Result<()> {
    let operator = operators.first().map_or("<none>", |op| op.name());
    if !hierarchy.contains(variant) {
        return Err(DispatchError::UnknownTarget {
            operator: operator.to_string(),
            target: format!("#{}", variant.index()),
        });
    }
    if hierarchy.is_composite(variant) && !operators.is_empty() {
        return Err(DispatchError::CompositeTarget {
            operator: operator.to_string(),
            variant: hierarchy.name(variant).to_string(),
        });
    }
    Ok(())
}
