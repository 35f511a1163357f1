//! Factors: scoring functions over a fixed tuple of neighbor variables.
//!
//! Every factor belongs to a family and is identified by a [`FactorKey`]:
//! the family identity plus the ordered neighbor identities. Two factors
//! produced independently (for example by unrolling from two different seeds)
//! are the same factor iff their keys are equal.

#[cfg(test)]
mod tests;

use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use factorforge_core::{
    Assignment, FactorForgeError, Result, Tensor, Value, VarId, Variable, Weights,
};
use smallvec::SmallVec;

use crate::family::{Family, Potential};

/// Process-unique identity of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(u64);

impl FamilyId {
    /// Allocates a fresh identity.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        FamilyId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Identity-defining key of a factor: family plus ordered neighbor tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactorKey {
    family: FamilyId,
    neighbors: SmallVec<[VarId; 4]>,
}

impl FactorKey {
    pub fn new(family: FamilyId, neighbors: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            family,
            neighbors: neighbors.into_iter().collect(),
        }
    }

    pub fn family(&self) -> FamilyId {
        self.family
    }

    pub fn neighbors(&self) -> &[VarId] {
        &self.neighbors
    }
}

/// A scoring function over the values of its neighbor variables.
///
/// `score` is the only required scoring method; the current and assignment
/// scores are derived from it by looking up neighbor values. Factors whose
/// family defines sufficient statistics also return them from `statistics`,
/// and for those `score(values)` is the family's statistics score applied to
/// `statistics(values)`.
pub trait Factor: Send + Sync + Debug {
    /// Family and ordered neighbor identities.
    fn key(&self) -> &FactorKey;

    /// Name of the family this factor belongs to.
    fn family_name(&self) -> &str;

    /// Ordered neighbor variables.
    fn variables(&self) -> &[Variable];

    /// Score of the given neighbor values, in neighbor order.
    ///
    /// # Errors
    ///
    /// `ArityMismatch` if `values.len()` differs from `num_variables()`.
    fn score(&self, values: &[Value]) -> Result<f64>;

    /// Sufficient statistics of the given neighbor values, if the family
    /// defines them.
    fn statistics(&self, _values: &[Value]) -> Result<Option<Tensor>> {
        Ok(None)
    }

    /// Parameters shared by every factor of this factor's family.
    fn weights(&self) -> Option<&Weights> {
        None
    }

    /// Downcasting support for kind-based filtering.
    fn as_any(&self) -> &dyn Any;

    fn family_id(&self) -> FamilyId {
        self.key().family()
    }

    fn num_variables(&self) -> usize {
        self.variables().len()
    }

    /// Neighbor values under the global assignment.
    fn current_values(&self) -> Vec<Value> {
        self.variables().iter().map(Variable::value).collect()
    }

    /// Score of the neighbors' current global values.
    fn current_score(&self) -> Result<f64> {
        self.score(&self.current_values())
    }

    /// Score of the neighbors' values under `assignment`.
    ///
    /// Unbound lookups follow the assignment kind's own rules; a map-based
    /// assignment missing a neighbor makes this fail with `VariableNotBound`.
    fn assignment_score(&self, assignment: &dyn Assignment) -> Result<f64> {
        let values = self
            .variables()
            .iter()
            .map(|v| assignment.value(v))
            .collect::<Result<Vec<_>>>()?;
        self.score(&values)
    }

    fn current_statistics(&self) -> Result<Option<Tensor>> {
        self.statistics(&self.current_values())
    }

    /// Returns true if `variable` is one of this factor's neighbors.
    fn touches(&self, variable: &Variable) -> bool {
        self.variables().contains(variable)
    }
}

/// Shared handle to a type-erased factor.
pub type FactorRef = Arc<dyn Factor>;

/// A factor of a [`Family`] with `N` neighbors.
pub struct FamilyFactor<const N: usize, P> {
    family: Family<N, P>,
    variables: [Variable; N],
    key: FactorKey,
}

impl<const N: usize, P: Potential<N>> FamilyFactor<N, P> {
    pub(crate) fn new(family: Family<N, P>, variables: [Variable; N]) -> Self {
        let key = FactorKey::new(family.id(), variables.iter().map(Variable::id));
        Self {
            family,
            variables,
            key,
        }
    }

    pub fn family(&self) -> &Family<N, P> {
        &self.family
    }

    pub fn neighbors(&self) -> &[Variable; N] {
        &self.variables
    }

    /// Current neighbor values as a fixed-size array.
    pub fn current_array(&self) -> [Value; N] {
        std::array::from_fn(|i| self.variables[i].value())
    }
}

fn as_array<const N: usize>(values: &[Value]) -> Result<&[Value; N]> {
    values
        .try_into()
        .map_err(|_| FactorForgeError::ArityMismatch {
            expected: N,
            found: values.len(),
        })
}

impl<const N: usize, P: Potential<N>> Factor for FamilyFactor<N, P> {
    fn key(&self) -> &FactorKey {
        &self.key
    }

    fn family_name(&self) -> &str {
        self.family.name()
    }

    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn score(&self, values: &[Value]) -> Result<f64> {
        self.family.potential().score(as_array::<N>(values)?)
    }

    fn statistics(&self, values: &[Value]) -> Result<Option<Tensor>> {
        self.family.potential().statistics(as_array::<N>(values)?)
    }

    fn weights(&self) -> Option<&Weights> {
        self.family.potential().weights()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn current_score(&self) -> Result<f64> {
        self.family.potential().score(&self.current_array())
    }
}

impl<const N: usize, P> Debug for FamilyFactor<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyFactor")
            .field("family", &self.family.name())
            .field("neighbors", &self.key.neighbors())
            .finish()
    }
}
