//! Templates: a family plus a rule for generating its factors.
//!
//! A template never materializes its factors up front. Asked for a seed
//! variable, it walks the relational structure through its [`Unroller`] and
//! builds exactly the factors of its family that the seed participates in.

mod relation;
mod unroll;


use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use factorforge_core::{Variable, Weights};
use tracing::trace;

use crate::factor::{Factor, FactorKey, FactorRef, FamilyId};
use crate::family::{Family, Potential};

pub use relation::{Adjacency, Sequences};
pub use unroll::{
    AdjacencyUnroller, AlignedUnroller, ChainUnroller, DomainUnroller, FnUnroller, Unroller,
};

/// A source of factors discovered from a seed variable.
pub trait Template: Send + Sync + fmt::Debug {
    fn family_id(&self) -> FamilyId;

    fn name(&self) -> &str;

    /// Neighbor count of every factor this template produces.
    fn arity(&self) -> usize;

    /// Every factor of this template's family that `seed` participates in.
    ///
    /// Empty when the seed admits no factors; never fails. Each returned
    /// factor has `seed` among its variables, and no two share a key.
    fn unroll(&self, seed: &Variable) -> Vec<FactorRef>;

    /// Union of `unroll` over `seeds`, without duplicates.
    fn unroll_all(&self, seeds: &[Variable]) -> Vec<FactorRef> {
        let mut seen = HashSet::new();
        seeds
            .iter()
            .flat_map(|seed| self.unroll(seed))
            .filter(|factor| seen.insert(factor.key().clone()))
            .collect()
    }

    /// Parameters of this template's family, if any.
    fn weights(&self) -> Option<&Weights> {
        None
    }
}

/// Shared handle to a type-erased template.
pub type TemplateRef = Arc<dyn Template>;

/// Template built from a family and an unroll strategy.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use factorforge_core::{DiscreteDomain, Value, Variable};
/// use factorforge_model::{ChainUnroller, Family, FamilyTemplate, Sequences, Template};
///
/// let states = Arc::new(DiscreteDomain::new("state", 2));
/// let chain: Vec<Variable> = (0..3)
///     .map(|_| Variable::new(states.clone(), Value::Discrete(0)).unwrap())
///     .collect();
///
/// let family = Family::from_fn("agree", |v: &[Value; 2]| if v[0] == v[1] { 1.0 } else { 0.0 });
/// let template = FamilyTemplate::new(family, ChainUnroller::new(Sequences::single(chain.clone())));
///
/// assert_eq!(template.unroll(&chain[0]).len(), 1);
/// assert_eq!(template.unroll(&chain[1]).len(), 2);
/// ```
pub struct FamilyTemplate<const N: usize, P, U> {
    family: Family<N, P>,
    unroller: U,
}

impl<const N: usize, P, U> FamilyTemplate<N, P, U>
where
    P: Potential<N>,
    U: Unroller<N>,
{
    pub fn new(family: Family<N, P>, unroller: U) -> Self {
        Self { family, unroller }
    }

    pub fn family(&self) -> &Family<N, P> {
        &self.family
    }

    pub fn unroller(&self) -> &U {
        &self.unroller
    }

    /// Neighbor tuples holding `seed` at `position`, without building factors.
    pub fn neighbors_at(&self, position: usize, seed: &Variable) -> Vec<[Variable; N]> {
        self.unroller.unroll_at(position, seed).collect()
    }
}

impl<const N: usize, P, U> Template for FamilyTemplate<N, P, U>
where
    P: Potential<N>,
    U: Unroller<N>,
{
    fn family_id(&self) -> FamilyId {
        self.family.id()
    }

    fn name(&self) -> &str {
        self.family.name()
    }

    fn arity(&self) -> usize {
        N
    }

    fn unroll(&self, seed: &Variable) -> Vec<FactorRef> {
        let mut seen: HashSet<FactorKey> = HashSet::new();
        let mut factors: Vec<FactorRef> = Vec::new();
        for position in 0..N {
            for neighbors in self.unroller.unroll_at(position, seed) {
                // A strategy may only place the seed where it was asked to.
                if neighbors[position] != *seed {
                    continue;
                }
                let factor = self.family.factor(neighbors);
                if seen.insert(factor.key().clone()) {
                    factors.push(Arc::new(factor));
                }
            }
        }
        trace!(
            event = "unroll",
            template = %self.family.name(),
            seed = %seed,
            factors = factors.len(),
        );
        factors
    }

    fn weights(&self) -> Option<&Weights> {
        self.family.weights()
    }
}

impl<const N: usize, P, U> fmt::Debug for FamilyTemplate<N, P, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyTemplate")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}
