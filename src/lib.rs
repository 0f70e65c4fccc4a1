//! Operator dispatch for evolutionary optimizers.
//!
//! Given a genotype instance, decides which registered operator (mutation,
//! crossover, ...) acts on it:
//!
//! - **Genotype hierarchy**: explicit single-rooted is-a hierarchy of
//!   genotype variants with one composite variant and a total specificity
//!   order.
//! - **Predicates**: exact-variant matching plus custom applicability tests.
//! - **Selectors**: random and round-robin strategies for choosing among
//!   several applicable operators.
//! - **Dispatch**: one-time directory build, memoized ancestor fallback, and
//!   selector delegation, safe under concurrent resolution.
//!
//! # Architecture
//!
//! This crate sits next to the metaheuristic runners: it contains no
//! operator implementations and no genotype representations. Both are
//! supplied by consumers through the [`operator::Operator`] and
//! [`genotype::Genotype`] traits.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_genop::dispatch::{OperatorDispatcher, Wiring};
//! use u_genop::genotype::{Genotype, GenotypeHierarchy, GenotypeId, Variant};
//! use u_genop::operator::{Operator, OperatorKind, OperatorPredicate};
//!
//! struct Flip;
//! impl Operator for Flip {
//!     fn name(&self) -> &str { "Flip" }
//!     fn kind(&self) -> OperatorKind { OperatorKind::MUTATE }
//!     fn target(&self) -> &str { "Binary" }
//! }
//!
//! struct Bits(Variant, GenotypeId);
//! impl Genotype for Bits {
//!     fn variant(&self) -> Variant { self.0 }
//!     fn id(&self) -> GenotypeId { self.1 }
//! }
//!
//! let mut builder = GenotypeHierarchy::builder("Genotype");
//! let root = builder.root();
//! let binary = builder.add("Binary", root).unwrap();
//! let boolean = builder.add("Boolean", binary).unwrap();
//! builder.add_composite("Composite", root).unwrap();
//! let hierarchy = Arc::new(builder.build().unwrap());
//!
//! let dispatcher: OperatorDispatcher<Bits, Flip> =
//!     OperatorDispatcher::new(OperatorKind::MUTATE, hierarchy, Vec::new());
//! dispatcher
//!     .inject(&Wiring::empty().bind(OperatorPredicate::Void, Arc::new(Flip)))
//!     .unwrap();
//!
//! let op = dispatcher.resolve(&Bits(boolean, GenotypeId::next())).unwrap();
//! assert_eq!(op.unwrap().name(), "Flip");
//! ```

pub mod dispatch;
pub mod error;
pub mod genotype;
pub mod operator;
pub mod random;
pub mod selection;

pub use error::{DispatchError, HierarchyError};
