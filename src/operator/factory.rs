//! Operator type descriptors and instantiation.

use crate::error::{DispatchError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Describes an operator type that a dispatcher instantiates on build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorType {
    name: String,
}

impl OperatorType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Constructs operator instances from their type descriptors.
///
/// Supplied by the bootstrap layer; called once per default operator type
/// while the directory is built.
pub trait OperatorFactory<O: ?Sized>: Send + Sync {
    fn instantiate(&self, ty: &OperatorType) -> Result<Arc<O>>;
}

type Constructor<O> = Box<dyn Fn() -> Arc<O> + Send + Sync>;

/// A factory backed by a table of named constructors.
///
/// # Examples
///
/// ```ignore
/// let mut types: TypeRegistry<dyn Mutate> = TypeRegistry::new();
/// types.register("BitFlip", || Arc::new(BitFlip::default()) as Arc<dyn Mutate>);
/// ```
pub struct TypeRegistry<O: ?Sized> {
    constructors: HashMap<String, Constructor<O>>,
}

impl<O: ?Sized> TypeRegistry<O> {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers (or replaces) the constructor for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> Arc<O> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<O: ?Sized> Default for TypeRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized> OperatorFactory<O> for TypeRegistry<O> {
    fn instantiate(&self, ty: &OperatorType) -> Result<Arc<O>> {
        let constructor =
            self.constructors
                .get(ty.name())
                .ok_or_else(|| DispatchError::UnknownOperatorType {
                    operator: ty.name().to_string(),
                })?;
        Ok(constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_instantiates_registered_type() {
        let mut types: TypeRegistry<str> = TypeRegistry::new();
        types.register("Swap", || Arc::from("swap"));
        assert!(types.contains("Swap"));
        assert_eq!(types.len(), 1);

        let op = types.instantiate(&OperatorType::new("Swap")).unwrap();
        assert_eq!(&*op, "swap");
    }

    #[test]
    fn test_registry_unknown_type_is_configuration_error() {
        let types: TypeRegistry<str> = TypeRegistry::default();
        let err = types
            .instantiate(&OperatorType::new("Missing"))
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_each_instantiation_is_fresh() {
        let mut types: TypeRegistry<String> = TypeRegistry::new();
        types.register("Copy", || Arc::new(String::from("copy")));
        let a = types.instantiate(&OperatorType::new("Copy")).unwrap();
        let b = types.instantiate(&OperatorType::new("Copy")).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
