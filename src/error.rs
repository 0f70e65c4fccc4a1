//! Error types for operator dispatch.
//!
//! Two families exist: configuration errors, raised while the operator
//! directory is assembled, and incompatibility errors, raised by
//! [`OperatorDispatcher::resolve`](crate::dispatch::OperatorDispatcher::resolve)
//! when a genotype cannot be routed to exactly one operator.

use thiserror::Error;

/// Errors raised while building a [`GenotypeHierarchy`](crate::genotype::GenotypeHierarchy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("genotype variant `{name}` is already declared")]
    DuplicateVariant { name: String },

    #[error("parent variant `{parent}` of `{name}` is not declared")]
    UnknownParent { name: String, parent: String },

    #[error("composite variant already set to `{existing}`, cannot also designate `{name}`")]
    CompositeAlreadySet { existing: String, name: String },

    #[error("hierarchy rooted at `{root}` has no composite variant")]
    MissingComposite { root: String },

    #[error("cannot declare `{name}`: a hierarchy holds at most {limit} variants")]
    TooManyVariants { name: String, limit: usize },
}

/// Errors raised by the operator directory and the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("operator type `{operator}` cannot be instantiated by the configured factory")]
    UnknownOperatorType { operator: String },

    #[error("no target genotype variant `{target}` is declared for the operator `{operator}`")]
    UnknownTarget { operator: String, target: String },

    #[error("operator `{operator}` targets the composite variant `{variant}`, which is never operated on directly")]
    CompositeTarget { operator: String, variant: String },

    #[error("invalid dispatch configuration: {0}")]
    InvalidConfig(String),

    #[error("no {kind} operator is applicable to genotype variant `{variant}`")]
    NoApplicableOperator { variant: String, kind: String },

    #[error("{candidates} {kind} operators are applicable to genotype variant `{variant}` but no operator selector is registered (required)")]
    SelectorRequired {
        variant: String,
        kind: String,
        candidates: usize,
    },

    #[error("operator selector for ({variant}, {kind}) returned index {index:?} out of {candidates} candidates")]
    SelectorDeclined {
        variant: String,
        kind: String,
        index: Option<usize>,
        candidates: usize,
    },
}

impl DispatchError {
    /// Returns `true` for errors caused by the operator wiring itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DispatchError::UnknownOperatorType { .. }
                | DispatchError::UnknownTarget { .. }
                | DispatchError::CompositeTarget { .. }
                | DispatchError::InvalidConfig(_)
        )
    }

    /// Returns `true` for errors raised while routing a genotype.
    pub fn is_incompatibility(&self) -> bool {
        !self.is_configuration()
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DispatchError>;
