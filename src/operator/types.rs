//! Core trait for operators and their kinds.

use crate::error::{DispatchError, Result};
use crate::genotype::{GenotypeHierarchy, Variant};
use std::fmt;

/// Discriminator for the family an operator belongs to.
///
/// Selectors are registered per `(variant, kind)`, so two operators of
/// different kinds never compete for the same genotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorKind(&'static str);

impl OperatorKind {
    pub const MUTATE: OperatorKind = OperatorKind("mutate");
    pub const CROSSOVER: OperatorKind = OperatorKind("crossover");
    pub const COPY: OperatorKind = OperatorKind("copy");
    pub const NEIGHBOR: OperatorKind = OperatorKind("neighbor");
    pub const DIVERSITY: OperatorKind = OperatorKind("diversity");
    pub const ALGEBRA: OperatorKind = OperatorKind("algebra");

    /// Declares a kind outside the built-in set.
    pub const fn new(name: &'static str) -> Self {
        OperatorKind(name)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An operator that acts on genotypes of one target variant.
///
/// Every operator declares its target explicitly, by the fully-qualified
/// name of a variant in the dispatcher's [`GenotypeHierarchy`].
///
/// Kind-specific operator traits extend this one; the dispatcher is then
/// instantiated with the trait object:
///
/// ```ignore
/// trait Mutate: Operator {
///     fn mutate(&self, genotype: &mut MyGenotype, rate: f64);
/// }
///
/// let dispatcher: OperatorDispatcher<MyGenotype, dyn Mutate> =
///     OperatorDispatcher::new(OperatorKind::MUTATE, hierarchy, defaults);
/// ```
pub trait Operator: Send + Sync {
    /// Human-readable name, used in errors and logs.
    fn name(&self) -> &str;

    /// The family this operator belongs to.
    fn kind(&self) -> OperatorKind;

    /// Fully-qualified name of the variant this operator acts on.
    fn target(&self) -> &str;
}

/// Resolves the declared target of `operator` against `hierarchy`.
///
/// Fails when the target is not declared or names the composite variant.
pub fn derive_target<O: Operator + ?Sized>(
    operator: &O,
    hierarchy: &GenotypeHierarchy,
) -> Result<Variant> {
    let variant =
        hierarchy
            .lookup(operator.target())
            .ok_or_else(|| DispatchError::UnknownTarget {
                operator: operator.name().to_string(),
                target: operator.target().to_string(),
            })?;
    if hierarchy.is_composite(variant) {
        return Err(DispatchError::CompositeTarget {
            operator: operator.name().to_string(),
            variant: hierarchy.name(variant).to_string(),
        });
    }
    Ok(variant)
}
