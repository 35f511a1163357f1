//! Union of several models.

use std::fmt;
use std::sync::Arc;

use factorforge_core::Variable;

use super::{FactorCollector, Model, NeighborhoodMode};
use crate::factor::FactorRef;

/// A model whose factors are the duplicate-free union of its parts.
///
/// The usual composition is an `ItemizedModel` of hand-built factors next
/// to a `TemplateModel` of relational patterns.
#[derive(Clone, Default)]
pub struct CombinedModel {
    models: Vec<Arc<dyn Model>>,
    neighborhood: NeighborhoodMode,
}

impl CombinedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodMode) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn add(&mut self, model: impl Model + 'static) -> &mut Self {
        self.models.push(Arc::new(model));
        self
    }

    /// Builder-style [`CombinedModel::add`].
    pub fn with(mut self, model: impl Model + 'static) -> Self {
        self.add(model);
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Model for CombinedModel {
    fn factors_with(&self, variables: &[Variable], mode: NeighborhoodMode) -> Vec<FactorRef> {
        let mut collector = FactorCollector::new();
        for model in &self.models {
            collector.extend(model.factors_with(variables, mode));
        }
        collector.into_vec()
    }

    fn default_mode(&self) -> NeighborhoodMode {
        self.neighborhood
    }

    fn parallel_threshold(&self) -> usize {
        self.models
            .iter()
            .map(|m| m.parallel_threshold())
            .min()
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Debug for CombinedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedModel")
            .field("models", &self.models.len())
            .field("neighborhood", &self.neighborhood)
            .finish()
    }
}
