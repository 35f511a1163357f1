//! FactorForge Core - the model substrate for factor graphs
//!
//! This crate provides the leaf abstractions every factor graph is built from:
//! - Values and domains (enumerable, growable categorical, unbounded)
//! - Variables holding a current value and an optional target value
//! - Assignments: alternative variable-to-value lenses
//! - Reversible mutation history (`Diff`, `DiffList`)
//! - Tensors and the parameter store (`Weights`, `WeightsSet`, `WeightsMap`)
//!
//! Factors, templates and models live in `factorforge-model`.

pub mod diff;
pub mod domain;
pub mod error;
pub mod tensor;
pub mod value;
pub mod variable;
pub mod weights;

#[cfg(test)]
mod tensor_tests;

pub use diff::{Diff, DiffList};
pub use domain::{
    BooleanDomain, CategoricalDomain, DiscreteDomain, Domain, DomainId, DomainRef,
    IntegerRangeDomain, RealDomain, TextDomain,
};
pub use error::{FactorForgeError, Result};
pub use tensor::{Shape, Tensor};
pub use value::Value;
pub use variable::{
    Assignment, Assignment1, Assignment2, Assignment3, Assignment4, FixedAssignment,
    GlobalAssignment, MapAssignment, TargetAssignment, VarId, Variable, VariableBuilder,
};
pub use weights::{TensorSet, Weights, WeightsKey, WeightsMap, WeightsSet};
