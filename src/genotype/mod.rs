//! Genotype variants and their is-a hierarchy.
//!
//! Variants are declared explicitly in a [`GenotypeHierarchy`] rather than
//! discovered from runtime types. The hierarchy answers the two questions
//! dispatch needs: "is variant B a subtype of A" and "which of two variants
//! is more specific".

mod hierarchy;
mod types;

pub use hierarchy::{Ancestors, GenotypeHierarchy, HierarchyBuilder, Variant, MAX_VARIANTS};
pub use types::{Genotype, GenotypeId};
