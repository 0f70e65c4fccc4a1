//! Operators, their kinds, and applicability predicates.
//!
//! The dispatcher treats every operator uniformly through the [`Operator`]
//! trait: a name, a kind, and an explicitly declared target variant.
//! Applicability is expressed with [`OperatorPredicate`].

mod factory;
mod predicate;
mod types;

pub use factory::{OperatorFactory, OperatorType, TypeRegistry};
pub use predicate::{CustomPredicate, OperatorPredicate};
pub use types::{derive_target, Operator, OperatorKind};
