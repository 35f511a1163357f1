//! Model over an explicit list of factors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use factorforge_core::{VarId, Variable};
use tracing::debug;

use super::{query_ids, FactorCollector, Model, NeighborhoodMode};
use crate::factor::{Factor, FactorKey, FactorRef};

/// A model holding explicitly registered factors.
///
/// Factors are indexed by neighbor, so queries cost the number of factors
/// touching the queried variables rather than the model size.
#[derive(Debug, Default)]
pub struct ItemizedModel {
    factors: Vec<FactorRef>,
    keys: HashSet<FactorKey>,
    by_variable: HashMap<VarId, Vec<usize>>,
    neighborhood: NeighborhoodMode,
}

impl ItemizedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodMode) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Registers `factor`. Returns false if a factor with its key is
    /// already registered.
    pub fn add(&mut self, factor: impl Factor + 'static) -> bool {
        self.add_ref(Arc::new(factor))
    }

    /// Registers a shared factor. Returns false on a duplicate key.
    pub fn add_ref(&mut self, factor: FactorRef) -> bool {
        if !self.keys.insert(factor.key().clone()) {
            return false;
        }
        let index = self.factors.len();
        // A factor may list the same variable twice; index it once.
        let ids: HashSet<VarId> = factor.key().neighbors().iter().copied().collect();
        for id in ids {
            self.by_variable.entry(id).or_default().push(index);
        }
        self.factors.push(factor);
        true
    }

    /// Registers every factor in `factors`, returning how many were new.
    pub fn extend(&mut self, factors: impl IntoIterator<Item = FactorRef>) -> usize {
        let added = factors.into_iter().filter(|f| self.add_ref(f.clone())).count();
        debug!(event = "factors_registered", added, total = self.factors.len());
        added
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactorRef> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl Model for ItemizedModel {
    fn factors_with(&self, variables: &[Variable], mode: NeighborhoodMode) -> Vec<FactorRef> {
        let query = query_ids(variables);
        let mut collector = FactorCollector::new();
        for variable in variables {
            let Some(indices) = self.by_variable.get(&variable.id()) else {
                continue;
            };
            collector.extend(
                indices
                    .iter()
                    .map(|&i| &self.factors[i])
                    .filter(|f| mode.admits(f.as_ref(), &query))
                    .cloned(),
            );
        }
        collector.into_vec()
    }

    fn default_mode(&self) -> NeighborhoodMode {
        self.neighborhood
    }
}
