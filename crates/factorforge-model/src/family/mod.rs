//! Families: shared scoring definitions for structurally identical factors.
//!
//! A `Family<N, P>` pairs a neighbor arity `N` with a pluggable [`Potential`].
//! Every factor created from a family shares its potential, so a dot-product
//! family's weights are tied across all of its factors.
//!
//! Potentials provided here:
//! - [`FnPotential`]: a closure over neighbor values
//! - [`StatisticsPotential`]: sufficient statistics plus a statistics score
//! - [`DotPotential`]: sufficient statistics dotted with a `Weights` tensor

mod statistics;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use factorforge_core::{FactorForgeError, Result, Tensor, Value, Variable, Weights};
use tracing::debug;

use crate::factor::{FactorRef, FamilyFactor, FamilyId};

pub use statistics::{DiscreteStatistics, FnStatistics, Statistics};

/// Scoring strategy of an `N`-ary family.
pub trait Potential<const N: usize>: Send + Sync + 'static {
    /// Score of one neighbor-value tuple.
    fn score(&self, values: &[Value; N]) -> Result<f64>;

    /// Sufficient statistics of one neighbor-value tuple, if defined.
    fn statistics(&self, _values: &[Value; N]) -> Result<Option<Tensor>> {
        Ok(None)
    }

    /// Parameters this potential scores against, if any.
    fn weights(&self) -> Option<&Weights> {
        None
    }
}

/// Potential defined by a closure over neighbor values.
pub struct FnPotential<F> {
    score: F,
}

impl<F> FnPotential<F> {
    pub fn new(score: F) -> Self {
        Self { score }
    }
}

impl<const N: usize, F> Potential<N> for FnPotential<F>
where
    F: Fn(&[Value; N]) -> f64 + Send + Sync + 'static,
{
    fn score(&self, values: &[Value; N]) -> Result<f64> {
        Ok((self.score)(values))
    }
}

/// Potential scored through sufficient statistics.
///
/// `score(values) == statistics_score(statistics(values))` for every tuple.
pub struct StatisticsPotential<S, F> {
    statistics: S,
    score: F,
}

impl<S, F> StatisticsPotential<S, F>
where
    F: Fn(&Tensor) -> f64,
{
    pub fn new(statistics: S, score: F) -> Self {
        Self { statistics, score }
    }

    /// Score of a statistics tensor.
    pub fn statistics_score(&self, statistics: &Tensor) -> f64 {
        (self.score)(statistics)
    }
}

impl<const N: usize, S, F> Potential<N> for StatisticsPotential<S, F>
where
    S: Statistics<N>,
    F: Fn(&Tensor) -> f64 + Send + Sync + 'static,
{
    fn score(&self, values: &[Value; N]) -> Result<f64> {
        let statistics = self.statistics.statistics(values)?;
        Ok(self.statistics_score(&statistics))
    }

    fn statistics(&self, values: &[Value; N]) -> Result<Option<Tensor>> {
        self.statistics.statistics(values).map(Some)
    }
}

/// Potential scoring `dot(statistics(values), weights)`.
///
/// The weights handle is shared with the owning `WeightsSet`, so parameter
/// updates are seen by every factor of the family.
pub struct DotPotential<S> {
    statistics: S,
    weights: Weights,
}

impl<S> DotPotential<S> {
    /// Creates a dot-product potential.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the statistics shape differs from the weights shape.
    pub fn new<const N: usize>(statistics: S, weights: Weights) -> Result<Self>
    where
        S: Statistics<N>,
    {
        let shape = weights.shape();
        if statistics.shape() != shape.as_slice() {
            return Err(FactorForgeError::ShapeMismatch {
                expected: shape.to_vec(),
                found: statistics.shape().to_vec(),
            });
        }
        Ok(Self {
            statistics,
            weights,
        })
    }

    /// Inner product of a statistics tensor with the current weights.
    pub fn statistics_score(&self, statistics: &Tensor) -> Result<f64> {
        self.weights.dot(statistics)
    }
}

impl<const N: usize, S: Statistics<N>> Potential<N> for DotPotential<S> {
    fn score(&self, values: &[Value; N]) -> Result<f64> {
        let statistics = self.statistics.statistics(values)?;
        self.statistics_score(&statistics)
    }

    fn statistics(&self, values: &[Value; N]) -> Result<Option<Tensor>> {
        self.statistics.statistics(values).map(Some)
    }

    fn weights(&self) -> Option<&Weights> {
        Some(&self.weights)
    }
}

struct FamilyInner<P> {
    id: FamilyId,
    name: Arc<str>,
    potential: P,
}

/// A shared scoring definition for `N`-ary factors.
///
/// Clones share identity and potential.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use factorforge_core::{DiscreteDomain, Tensor, Value, Variable, Weights};
/// use factorforge_model::{DiscreteStatistics, Factor, Family};
///
/// let states = Arc::new(DiscreteDomain::new("state", 2));
/// let a = Variable::new(states.clone(), Value::Discrete(0)).unwrap();
/// let b = Variable::new(states, Value::Discrete(0)).unwrap();
///
/// let weights = Weights::new(
///     "transition",
///     Tensor::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap(),
/// );
/// let family = Family::dot("transition", DiscreteStatistics::new([2, 2]), weights).unwrap();
///
/// let factor = family.factor([a, b]);
/// assert_eq!(factor.current_score().unwrap(), 1.0);
/// ```
pub struct Family<const N: usize, P> {
    inner: Arc<FamilyInner<P>>,
}

impl<const N: usize, P> Family<N, P> {
    pub fn id(&self) -> FamilyId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn potential(&self) -> &P {
        &self.inner.potential
    }

    pub fn arity(&self) -> usize {
        N
    }
}

impl<const N: usize, P: Potential<N>> Family<N, P> {
    /// Creates a family with a fresh identity.
    pub fn new(name: impl Into<Arc<str>>, potential: P) -> Self {
        let family = Self {
            inner: Arc::new(FamilyInner {
                id: FamilyId::next(),
                name: name.into(),
                potential,
            }),
        };
        debug!(
            event = "family_created",
            family = %family.name(),
            id = %family.id(),
            arity = N,
        );
        family
    }

    /// Factor of this family over `neighbors`, in order.
    pub fn factor(&self, neighbors: [Variable; N]) -> FamilyFactor<N, P> {
        FamilyFactor::new(self.clone(), neighbors)
    }

    /// Type-erased factor of this family over `neighbors`.
    pub fn factor_ref(&self, neighbors: [Variable; N]) -> FactorRef {
        Arc::new(self.factor(neighbors))
    }

    pub fn weights(&self) -> Option<&Weights> {
        self.inner.potential.weights()
    }
}

impl<const N: usize, F> Family<N, FnPotential<F>>
where
    F: Fn(&[Value; N]) -> f64 + Send + Sync + 'static,
{
    /// Family scored by a closure over neighbor values.
    pub fn from_fn(name: impl Into<Arc<str>>, score: F) -> Self {
        Self::new(name, FnPotential::new(score))
    }
}

impl<const N: usize, S: Statistics<N>> Family<N, DotPotential<S>> {
    /// Dot-product family over `statistics` and `weights`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the statistics shape differs from the weights shape.
    pub fn dot(name: impl Into<Arc<str>>, statistics: S, weights: Weights) -> Result<Self> {
        Ok(Self::new(name, DotPotential::new::<N>(statistics, weights)?))
    }
}

impl<const N: usize, S, F> Family<N, StatisticsPotential<S, F>>
where
    S: Statistics<N>,
    F: Fn(&Tensor) -> f64 + Send + Sync + 'static,
{
    /// Family scored by a custom function of sufficient statistics.
    pub fn with_statistics(name: impl Into<Arc<str>>, statistics: S, score: F) -> Self {
        Self::new(name, StatisticsPotential::new(statistics, score))
    }
}

impl<const N: usize, P> Clone for Family<N, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<const N: usize, P> fmt::Debug for Family<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Family")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("arity", &N)
            .finish()
    }
}
