//! Models: aggregators of factor sources.
//!
//! A model answers one question: which factors neighbor a set of variables.
//! Two readings of "neighbor" exist, and every query names the one it means
//! through [`NeighborhoodMode`]:
//!
//! - `Any`: factors touching at least one queried variable
//! - `Contained`: factors whose variables all lie in the queried set
//!
//! Query results never contain two factors with the same [`FactorKey`],
//! even when independently produced by different unroll calls.

mod combined;
mod itemized;
mod templated;


use std::any::Any;
use std::collections::HashSet;

use factorforge_core::{Assignment, DiffList, Result, VarId, Variable};
use rayon::prelude::*;
use tracing::trace;

use crate::factor::{Factor, FactorKey, FactorRef, FamilyId};

pub use combined::CombinedModel;
pub use itemized::ItemizedModel;
pub use templated::{TemplateModel, DEFAULT_PARALLEL_THRESHOLD};

/// Which factors count as neighboring a queried variable set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NeighborhoodMode {
    /// Factors touching any queried variable.
    #[default]
    Any,
    /// Factors all of whose variables are queried.
    Contained,
}

impl NeighborhoodMode {
    /// Returns true if `factor` belongs to the neighborhood of `query`.
    pub fn admits(self, factor: &dyn Factor, query: &HashSet<VarId>) -> bool {
        let mut ids = factor.key().neighbors().iter();
        match self {
            NeighborhoodMode::Any => ids.any(|id| query.contains(id)),
            NeighborhoodMode::Contained => ids.all(|id| query.contains(id)),
        }
    }
}

/// A source of factors.
pub trait Model: Send + Sync {
    /// Factors neighboring `variables` under `mode`, without duplicates.
    fn factors_with(&self, variables: &[Variable], mode: NeighborhoodMode) -> Vec<FactorRef>;

    /// Mode used by [`Model::factors`].
    fn default_mode(&self) -> NeighborhoodMode {
        NeighborhoodMode::Any
    }

    /// Factor count above which scoring runs in parallel.
    fn parallel_threshold(&self) -> usize {
        usize::MAX
    }

    /// Factors neighboring `variables` under the default mode.
    fn factors(&self, variables: &[Variable]) -> Vec<FactorRef> {
        self.factors_with(variables, self.default_mode())
    }

    /// Factors touching `variable`.
    fn factors_of_variable(&self, variable: &Variable) -> Vec<FactorRef> {
        self.factors_with(std::slice::from_ref(variable), NeighborhoodMode::Any)
    }

    /// Factors of one family neighboring `variables`.
    fn factors_of_family(&self, variables: &[Variable], family: FamilyId) -> Vec<FactorRef> {
        self.factors(variables)
            .into_iter()
            .filter(|f| f.family_id() == family)
            .collect()
    }

    /// Sum of the current scores of `factors(variables)`.
    fn current_score(&self, variables: &[Variable]) -> Result<f64> {
        self.factors(variables).iter().map(|f| f.current_score()).sum()
    }

    /// Sum of the scores of `factors(variables)` under `assignment`.
    fn assignment_score(&self, variables: &[Variable], assignment: &dyn Assignment) -> Result<f64> {
        self.factors(variables)
            .iter()
            .map(|f| f.assignment_score(assignment))
            .sum()
    }
}

/// Extension methods available on every model.
pub trait ModelExt: Model {
    /// Factors of concrete type `T` neighboring `variables`.
    fn factors_of_kind<T: Factor + Any>(&self, variables: &[Variable]) -> Vec<FactorRef> {
        self.factors(variables)
            .into_iter()
            .filter(|f| f.as_any().is::<T>())
            .collect()
    }

    /// Current score of `variables`, in parallel past the model's threshold.
    ///
    /// Safe only while no variable or weight is mutated concurrently.
    fn par_current_score(&self, variables: &[Variable]) -> Result<f64> {
        let factors = self.factors(variables);
        if factors.len() < self.parallel_threshold() {
            return factors.iter().map(|f| f.current_score()).sum();
        }
        trace!(event = "parallel_score", factors = factors.len());
        factors.par_iter().map(|f| f.current_score()).sum()
    }

    /// Score change caused by the changes recorded in `diff`.
    ///
    /// Scores the factors touching the changed variables after and before
    /// the change (by undoing and redoing it), and returns after minus
    /// before. The variables are left in the post-change state.
    fn diff_score(&self, diff: &DiffList) -> Result<f64> {
        let variables = diff.variables();
        let factors = self.factors_with(&variables, NeighborhoodMode::Any);
        let score = |factors: &[FactorRef]| -> Result<f64> {
            factors.iter().map(|f| f.current_score()).sum()
        };

        let after = score(&factors);
        diff.undo_all();
        let before = score(&factors);
        diff.redo_all();

        trace!(
            event = "diff_score",
            changes = diff.len(),
            factors = factors.len(),
        );
        Ok(after? - before?)
    }
}

impl<M: Model + ?Sized> ModelExt for M {}

/// Accumulates factors, dropping repeats by key.
#[derive(Default)]
pub(crate) struct FactorCollector {
    seen: HashSet<FactorKey>,
    factors: Vec<FactorRef>,
}

impl FactorCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, factor: FactorRef) {
        if self.seen.insert(factor.key().clone()) {
            self.factors.push(factor);
        }
    }

    pub(crate) fn extend(&mut self, factors: impl IntoIterator<Item = FactorRef>) {
        factors.into_iter().for_each(|f| self.push(f));
    }

    pub(crate) fn into_vec(self) -> Vec<FactorRef> {
        self.factors
    }
}

pub(crate) fn query_ids(variables: &[Variable]) -> HashSet<VarId> {
    variables.iter().map(Variable::id).collect()
}
