//! Variable storage for BASIC programs
//!
//! A single flat namespace mapping variable names to integer values, plus the
//! resolver that turns an operand token into a value.

use crate::error::{ErrorKind, Result};
use std::collections::HashMap;

/// Variable storage system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    variables: HashMap<String, i64>,
}

impl VariableStore {
    /// Create an empty variable store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable's value
    pub fn get(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    /// Set a variable, overwriting any previous value
    pub fn set(&mut self, name: String, value: i64) {
        self.variables.insert(name, value);
    }

    /// Check if a variable exists
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over all variables in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Resolve a token to an integer
///
/// A bound variable name takes priority; otherwise the token must be a
/// base-10 integer literal.
pub fn lookup(token: &str, variables: &VariableStore) -> Result<i64> {
    if let Some(value) = variables.get(token) {
        return Ok(value);
    }
    token
        .parse::<i64>()
        .map_err(|_| ErrorKind::UnknownVariable(token.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_store() {
        let mut store = VariableStore::new();
        assert!(store.is_empty());

        store.set("x".to_string(), 42);
        assert_eq!(store.get("x"), Some(42));
        assert!(store.contains("x"));

        store.set("x".to_string(), -3);
        assert_eq!(store.get("x"), Some(-3));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lookup_variable() {
        let mut store = VariableStore::new();
        store.set("x".to_string(), 7);
        assert_eq!(lookup("x", &store).unwrap(), 7);
    }

    #[test]
    fn test_lookup_literal() {
        let store = VariableStore::new();
        assert_eq!(lookup("7", &store).unwrap(), 7);
        assert_eq!(lookup("-12", &store).unwrap(), -12);
    }

    #[test]
    fn test_lookup_unknown_variable() {
        let store = VariableStore::new();
        let err = lookup("x", &store).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnknownVariable(name) if name == "x"));
    }

    #[test]
    fn test_lookup_rejects_non_integer() {
        let store = VariableStore::new();
        assert!(lookup("1.5", &store).is_err());
        assert!(lookup("\"5\"", &store).is_err());
        assert!(lookup("", &store).is_err());
    }

    #[test]
    fn test_variable_shadows_literal_spelling() {
        // Only digit-leading names are rejected by LET, so "-5" can be bound
        let mut store = VariableStore::new();
        store.set("-5".to_string(), 100);
        assert_eq!(lookup("-5", &store).unwrap(), 100);
    }

    // Property-Based Tests

    #[test]
    fn prop_integer_variable_lookup_roundtrip() {
        fn property(value: i64) -> bool {
            let mut store = VariableStore::new();
            store.set("TEST".to_string(), value);
            lookup("TEST", &store).ok() == Some(value)
        }

        let mut qc = quickcheck::QuickCheck::new().tests(100);
        qc.quickcheck(property as fn(i64) -> bool);
    }

    #[test]
    fn prop_literal_lookup_roundtrip() {
        fn property(value: i64) -> bool {
            lookup(&value.to_string(), &VariableStore::new()).ok() == Some(value)
        }

        let mut qc = quickcheck::QuickCheck::new().tests(100);
        qc.quickcheck(property as fn(i64) -> bool);
    }
}
