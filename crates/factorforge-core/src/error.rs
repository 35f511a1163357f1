//! Error types for FactorForge

use thiserror::Error;

/// Main error type for FactorForge operations.
///
/// Every variant is a caller-triggered contract violation; none of them
/// describe an internal fault, and none are retried or absorbed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorForgeError {
    /// Interning an unknown category on a frozen domain
    #[error("Domain '{domain}' is frozen, cannot intern unknown category '{category}'")]
    DomainFrozen { domain: String, category: String },

    /// Interning past the configured category limit
    #[error("Domain '{domain}' is at capacity ({capacity} categories)")]
    DomainCapacity { domain: String, capacity: usize },

    /// Index lookup outside `[0, size)`
    #[error("Index {index} is outside domain '{domain}' of size {size}")]
    IndexOutOfDomain {
        domain: String,
        index: usize,
        size: usize,
    },

    /// Value does not belong to the domain
    #[error("Value {value} is not in domain '{domain}'")]
    ValueNotInDomain { domain: String, value: String },

    /// Enumeration requested from an unbounded domain
    #[error("Domain '{domain}' is not enumerable")]
    NotEnumerable { domain: String },

    /// Lookup of a variable a map-based assignment does not bind
    #[error("Variable {variable} is not bound in this assignment")]
    VariableNotBound { variable: String },

    /// Target value requested from a variable without one
    #[error("Variable {variable} has no target value")]
    NoTarget { variable: String },

    /// Aggregate tensor operation between incompatibly shaped operands
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Flat tensor index outside the tensor's length
    #[error("Tensor index {index} out of bounds for length {len}")]
    TensorIndex { index: usize, len: usize },

    /// Number of values does not match the number of factor neighbors
    #[error("Arity mismatch: expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Result type alias for FactorForge operations
pub type Result<T> = std::result::Result<T, FactorForgeError>;
