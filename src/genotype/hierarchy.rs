//! Genotype variant hierarchy and specificity order.

use crate::error::HierarchyError;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Upper bound on the number of variants in one hierarchy, root included.
pub const MAX_VARIANTS: usize = u32::MAX as usize;

/// Handle to a genotype variant declared in a [`GenotypeHierarchy`].
///
/// Handles are cheap to copy and only meaningful for the hierarchy that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variant(u32);

impl Variant {
    /// Position of this variant in declaration order (the root is 0).
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The handle for the `len`-th declared variant, if the hierarchy has room.
    fn at(len: usize) -> Option<Self> {
        if len >= MAX_VARIANTS {
            return None;
        }
        u32::try_from(len).ok().map(Variant)
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<Variant>,
    depth: usize,
}

/// A single-rooted is-a hierarchy of genotype variants.
///
/// Exactly one variant is designated *composite*: it aggregates other
/// genotypes and is never the target of an operator.
///
/// Variants are totally ordered by *specificity*: deeper variants come
/// first, ties are broken by fully-qualified name. An ancestor is always
/// shallower than its descendants, so it always sorts after them.
///
/// # Examples
///
/// ```
/// use u_genop::genotype::GenotypeHierarchy;
///
/// let mut builder = GenotypeHierarchy::builder("opt.Genotype");
/// let root = builder.root();
/// let base = builder.add("opt.Base", root).unwrap();
/// let derived = builder.add("opt.Derived", base).unwrap();
/// builder.add_composite("opt.Composite", root).unwrap();
/// let hierarchy = builder.build().unwrap();
///
/// assert!(hierarchy.is_a(derived, base));
/// assert!(hierarchy.is_proper_ancestor(base, derived));
/// assert!(hierarchy.specificity_rank(derived) < hierarchy.specificity_rank(base));
/// ```
#[derive(Debug, Clone)]
pub struct GenotypeHierarchy {
    nodes: Vec<Node>,
    by_name: HashMap<String, Variant>,
    composite: Variant,
    ranks: Vec<u32>,
}

impl GenotypeHierarchy {
    /// Starts a hierarchy whose root variant is `root`.
    pub fn builder(root: &str) -> HierarchyBuilder {
        HierarchyBuilder::new(root)
    }

    /// The root variant.
    pub fn root(&self) -> Variant {
        Variant(0)
    }

    /// The designated composite variant.
    pub fn composite(&self) -> Variant {
        self.composite
    }

    pub fn is_composite(&self, variant: Variant) -> bool {
        variant == self.composite
    }

    /// Number of declared variants.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `variant` was issued by this hierarchy.
    pub fn contains(&self, variant: Variant) -> bool {
        variant.index() < self.nodes.len()
    }

    /// Fully-qualified name of a variant.
    pub fn name(&self, variant: Variant) -> &str {
        self.nodes
            .get(variant.index())
            .map(|n| n.name.as_str())
            .unwrap_or("<foreign variant>")
    }

    pub fn parent(&self, variant: Variant) -> Option<Variant> {
        self.nodes.get(variant.index()).and_then(|n| n.parent)
    }

    /// Distance from the root (the root has depth 0).
    pub fn depth(&self, variant: Variant) -> usize {
        self.nodes.get(variant.index()).map_or(0, |n| n.depth)
    }

    /// Looks up a variant by its fully-qualified name.
    pub fn lookup(&self, name: &str) -> Option<Variant> {
        self.by_name.get(name).copied()
    }

    /// Returns `true` if `variant` is-a `ancestor` (reflexive).
    pub fn is_a(&self, variant: Variant, ancestor: Variant) -> bool {
        self.ancestors(variant).any(|v| v == ancestor)
    }

    /// Returns `true` if `ancestor` is a strict supertype of `variant`.
    pub fn is_proper_ancestor(&self, ancestor: Variant, variant: Variant) -> bool {
        ancestor != variant && self.is_a(variant, ancestor)
    }

    /// Iterates from `variant` up to the root, `variant` included.
    pub fn ancestors(&self, variant: Variant) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            next: self.contains(variant).then_some(variant),
        }
    }

    /// Position of `variant` in the specificity order (0 = most specific).
    pub fn specificity_rank(&self, variant: Variant) -> u32 {
        self.ranks.get(variant.index()).copied().unwrap_or(u32::MAX)
    }

    /// Compares two variants by specificity.
    pub fn cmp_specificity(&self, a: Variant, b: Variant) -> Ordering {
        self.specificity_rank(a).cmp(&self.specificity_rank(b))
    }

    /// All variants, most specific first.
    pub fn variants(&self) -> Vec<Variant> {
        let mut all: Vec<Variant> = self.nodes.iter().zip(0u32..).map(|(_, i)| Variant(i)).collect();
        all.sort_by_key(|&v| self.specificity_rank(v));
        all
    }
}

/// Iterator over a variant and its ancestors.
pub struct Ancestors<'a> {
    hierarchy: &'a GenotypeHierarchy,
    next: Option<Variant>,
}

impl Iterator for Ancestors<'_> {
    type Item = Variant;

    fn next(&mut self) -> Option<Variant> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

/// Incremental builder for a [`GenotypeHierarchy`].
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    nodes: Vec<Node>,
    by_name: HashMap<String, Variant>,
    composite: Option<Variant>,
}

impl HierarchyBuilder {
    /// Creates a builder holding only the root variant.
    pub fn new(root: &str) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert(root.to_string(), Variant(0));
        Self {
            nodes: vec![Node {
                name: root.to_string(),
                parent: None,
                depth: 0,
            }],
            by_name,
            composite: None,
        }
    }

    pub fn root(&self) -> Variant {
        Variant(0)
    }

    /// Declares `name` as a direct subtype of `parent`.
    pub fn add(&mut self, name: &str, parent: Variant) -> Result<Variant, HierarchyError> {
        if self.by_name.contains_key(name) {
            return Err(HierarchyError::DuplicateVariant {
                name: name.to_string(),
            });
        }
        let depth = match self.nodes.get(parent.index()) {
            Some(node) => node.depth + 1,
            None => {
                return Err(HierarchyError::UnknownParent {
                    name: name.to_string(),
                    parent: format!("#{}", parent.index()),
                })
            }
        };

        let variant = Variant::at(self.nodes.len()).ok_or_else(|| HierarchyError::TooManyVariants {
            name: name.to_string(),
            limit: MAX_VARIANTS,
        })?;
        self.nodes.push(Node {
            name: name.to_string(),
            parent: Some(parent),
            depth,
        });
        self.by_name.insert(name.to_string(), variant);
        Ok(variant)
    }

    /// Declares the composite variant as a direct subtype of `parent`.
    pub fn add_composite(&mut self, name: &str, parent: Variant) -> Result<Variant, HierarchyError> {
        if let Some(existing) = self.composite {
            return Err(HierarchyError::CompositeAlreadySet {
                existing: self.nodes[existing.index()].name.clone(),
                name: name.to_string(),
            });
        }
        let variant = self.add(name, parent)?;
        self.composite = Some(variant);
        Ok(variant)
    }

    /// Finalizes the hierarchy and computes the specificity order.
    pub fn build(self) -> Result<GenotypeHierarchy, HierarchyError> {
        let composite = self.composite.ok_or_else(|| HierarchyError::MissingComposite {
            root: self.nodes[0].name.clone(),
        })?;

        let mut order: Vec<usize> = (0..self.nodes.len()).collect();
        order.sort_by(|&a, &b| {
            let (na, nb) = (&self.nodes[a], &self.nodes[b]);
            nb.depth.cmp(&na.depth).then_with(|| na.name.cmp(&nb.name))
        });
        // `add` keeps the node count below MAX_VARIANTS, so every rank fits.
        let mut ranks = vec![0u32; self.nodes.len()];
        for (&index, rank) in order.iter().zip(0u32..) {
            ranks[index] = rank;
        }

        Ok(GenotypeHierarchy {
            nodes: self.nodes,
            by_name: self.by_name,
            composite,
            ranks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (GenotypeHierarchy, [Variant; 5]) {
        let mut b = GenotypeHierarchy::builder("g.Genotype");
        let root = b.root();
        let base = b.add("g.Base", root).unwrap();
        let derived = b.add("g.Derived", base).unwrap();
        let other = b.add("g.Another", root).unwrap();
        let composite = b.add_composite("g.Composite", root).unwrap();
        (b.build().unwrap(), [root, base, derived, other, composite])
    }

    #[test]
    fn test_is_a_relation() {
        let (h, [root, base, derived, other, composite]) = sample();
        assert!(h.is_a(derived, base));
        assert!(h.is_a(derived, root));
        assert!(h.is_a(derived, derived));
        assert!(!h.is_a(base, derived));
        assert!(!h.is_a(other, base));
        assert!(h.is_a(composite, root));
        assert!(!h.is_proper_ancestor(base, base));
        assert!(h.is_proper_ancestor(root, derived));
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let (h, [root, base, derived, _, _]) = sample();
        let chain: Vec<Variant> = h.ancestors(derived).collect();
        assert_eq!(chain, vec![derived, base, root]);
    }

    #[test]
    fn test_specificity_ancestor_sorts_after_descendant() {
        let (h, [root, base, derived, other, composite]) = sample();
        assert_eq!(h.cmp_specificity(derived, base), Ordering::Less);
        assert_eq!(h.cmp_specificity(base, root), Ordering::Less);
        assert_eq!(h.cmp_specificity(derived, root), Ordering::Less);
        // Same depth: by name ("g.Another" < "g.Base" < "g.Composite").
        assert_eq!(h.cmp_specificity(other, base), Ordering::Less);
        assert_eq!(h.cmp_specificity(base, composite), Ordering::Less);

        let order = h.variants();
        assert_eq!(order, vec![derived, other, base, composite, root]);
    }

    #[test]
    fn test_lookup_and_names() {
        let (h, [_, base, _, _, composite]) = sample();
        assert_eq!(h.lookup("g.Base"), Some(base));
        assert_eq!(h.lookup("g.Missing"), None);
        assert_eq!(h.name(composite), "g.Composite");
        assert!(h.is_composite(composite));
        assert_eq!(h.len(), 5);
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let mut b = GenotypeHierarchy::builder("g.Genotype");
        let root = b.root();
        b.add("g.Base", root).unwrap();
        assert_eq!(
            b.add("g.Base", root),
            Err(HierarchyError::DuplicateVariant {
                name: "g.Base".into()
            })
        );
    }

    #[test]
    fn test_missing_composite_rejected() {
        let b = GenotypeHierarchy::builder("g.Genotype");
        assert!(matches!(
            b.build(),
            Err(HierarchyError::MissingComposite { .. })
        ));
    }

    #[test]
    fn test_second_composite_rejected() {
        let mut b = GenotypeHierarchy::builder("g.Genotype");
        let root = b.root();
        b.add_composite("g.Composite", root).unwrap();
        assert!(matches!(
            b.add_composite("g.Other", root),
            Err(HierarchyError::CompositeAlreadySet { .. })
        ));
    }

    #[test]
    fn test_variant_handles_stop_at_the_cap() {
        assert_eq!(Variant::at(0), Some(Variant(0)));
        assert_eq!(Variant::at(MAX_VARIANTS - 1), Some(Variant(u32::MAX - 1)));
        assert_eq!(Variant::at(MAX_VARIANTS), None);
        assert_eq!(Variant::at(usize::MAX), None);
    }

    #[test]
    fn test_too_many_variants_message_names_limit() {
        let err = HierarchyError::TooManyVariants {
            name: "g.Extra".into(),
            limit: MAX_VARIANTS,
        };
        assert!(err.to_string().contains("g.Extra"));
        assert!(err.to_string().contains(&MAX_VARIANTS.to_string()));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut b = GenotypeHierarchy::builder("g.Genotype");
        assert!(matches!(
            b.add("g.Orphan", Variant(9)),
            Err(HierarchyError::UnknownParent { .. })
        ));
    }
}
