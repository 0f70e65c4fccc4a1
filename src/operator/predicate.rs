//! Applicability predicates.

use crate::genotype::{Genotype, Variant};
use std::fmt;
use std::sync::Arc;

type Test<G> = Arc<dyn Fn(&G) -> bool + Send + Sync>;

/// A caller-supplied applicability test, independent of the hierarchy.
///
/// Two custom predicates are equal only if they share the same underlying
/// closure (identity, not behavior). The closure should be deterministic:
/// its result is memoized per variant on the first lookup.
pub struct CustomPredicate<G: ?Sized> {
    label: Arc<str>,
    test: Test<G>,
}

impl<G: ?Sized> CustomPredicate<G> {
    pub fn new<F>(label: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&G) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, genotype: &G) -> bool {
        (self.test)(genotype)
    }

    fn identity(&self) -> *const () {
        Arc::as_ptr(&self.test) as *const ()
    }
}

impl<G: ?Sized> Clone for CustomPredicate<G> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            test: Arc::clone(&self.test),
        }
    }
}

impl<G: ?Sized> PartialEq for CustomPredicate<G> {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<G: ?Sized> Eq for CustomPredicate<G> {}

impl<G: ?Sized> fmt::Debug for CustomPredicate<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomPredicate").field(&self.label).finish()
    }
}

/// Decides whether an operator applies to a genotype instance.
pub enum OperatorPredicate<G: ?Sized> {
    /// Placeholder for "not specified yet"; replaced by
    /// [`OperatorPredicate::Variant`] of the operator's target on build.
    Void,

    /// Holds iff the genotype's runtime variant equals the given variant.
    Variant(Variant),

    /// Arbitrary test over the genotype instance.
    Custom(CustomPredicate<G>),
}

impl<G: Genotype + ?Sized> OperatorPredicate<G> {
    pub fn evaluate(&self, genotype: &G) -> bool {
        match self {
            OperatorPredicate::Void => false,
            OperatorPredicate::Variant(v) => genotype.variant() == *v,
            OperatorPredicate::Custom(custom) => custom.test(genotype),
        }
    }
}

impl<G: ?Sized> OperatorPredicate<G> {
    /// Shorthand for a custom predicate.
    pub fn custom<F>(label: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&G) -> bool + Send + Sync + 'static,
    {
        OperatorPredicate::Custom(CustomPredicate::new(label, test))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, OperatorPredicate::Void)
    }
}

impl<G: ?Sized> Clone for OperatorPredicate<G> {
    fn clone(&self) -> Self {
        match self {
            OperatorPredicate::Void => OperatorPredicate::Void,
            OperatorPredicate::Variant(v) => OperatorPredicate::Variant(*v),
            OperatorPredicate::Custom(c) => OperatorPredicate::Custom(c.clone()),
        }
    }
}

impl<G: ?Sized> PartialEq for OperatorPredicate<G> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OperatorPredicate::Void, OperatorPredicate::Void) => true,
            (OperatorPredicate::Variant(a), OperatorPredicate::Variant(b)) => a == b,
            (OperatorPredicate::Custom(a), OperatorPredicate::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl<G: ?Sized> Eq for OperatorPredicate<G> {}

impl<G: ?Sized> fmt::Debug for OperatorPredicate<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorPredicate::Void => f.write_str("Predicate Void"),
            OperatorPredicate::Variant(v) => write!(f, "Predicate [variant=#{}]", v.index()),
            OperatorPredicate::Custom(c) => write!(f, "Predicate [{}]", c.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{GenotypeHierarchy, GenotypeId};

    struct Sample {
        variant: Variant,
        len: usize,
    }

    impl Genotype for Sample {
        fn variant(&self) -> Variant {
            self.variant
        }
        fn id(&self) -> GenotypeId {
            GenotypeId::new(1)
        }
    }

    fn variants() -> (Variant, Variant) {
        let mut b = GenotypeHierarchy::builder("g.Genotype");
        let root = b.root();
        let a = b.add("g.A", root).unwrap();
        let c = b.add("g.B", root).unwrap();
        b.add_composite("g.Composite", root).unwrap();
        b.build().unwrap();
        (a, c)
    }

    #[test]
    fn test_void_is_always_false() {
        let (a, _) = variants();
        let g = Sample { variant: a, len: 3 };
        assert!(!OperatorPredicate::<Sample>::Void.evaluate(&g));
    }

    #[test]
    fn test_variant_predicate_is_exact() {
        let (a, b) = variants();
        let g = Sample { variant: a, len: 3 };
        assert!(OperatorPredicate::Variant(a).evaluate(&g));
        assert!(!OperatorPredicate::Variant(b).evaluate(&g));
    }

    #[test]
    fn test_custom_predicate_inspects_instance() {
        let (a, _) = variants();
        let p = OperatorPredicate::custom("long", |g: &Sample| g.len > 2);
        assert!(p.evaluate(&Sample { variant: a, len: 3 }));
        assert!(!p.evaluate(&Sample { variant: a, len: 1 }));
    }

    #[test]
    fn test_custom_predicate_equality_is_identity() {
        let p = CustomPredicate::<Sample>::new("x", |_| true);
        let q = CustomPredicate::<Sample>::new("x", |_| true);
        assert_eq!(p, p.clone());
        assert_ne!(p, q);
        assert_eq!(format!("{p:?}"), "CustomPredicate(\"x\")");
    }
}
