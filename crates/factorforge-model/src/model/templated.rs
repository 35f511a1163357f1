//! Model over templates, unrolled on demand.

use std::sync::Arc;

use factorforge_core::Variable;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::{query_ids, FactorCollector, Model, NeighborhoodMode};
use crate::factor::FactorRef;
use crate::template::{Template, TemplateRef};

/// Default factor count above which scoring and unrolling go parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// A model whose factors are generated by unrolling templates.
///
/// Nothing is materialized ahead of a query; each query unrolls every
/// template on every queried variable and keeps the admitted factors.
#[derive(Debug, Clone)]
pub struct TemplateModel {
    templates: Vec<TemplateRef>,
    neighborhood: NeighborhoodMode,
    parallel_threshold: usize,
}

impl Default for TemplateModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateModel {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            neighborhood: NeighborhoodMode::Any,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodMode) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Adds a template.
    pub fn add_template(&mut self, template: impl Template + 'static) -> &mut Self {
        self.add_template_ref(Arc::new(template))
    }

    pub fn add_template_ref(&mut self, template: TemplateRef) -> &mut Self {
        debug!(
            event = "template_registered",
            template = %template.name(),
            arity = template.arity(),
        );
        self.templates.push(template);
        self
    }

    /// Builder-style [`TemplateModel::add_template`].
    pub fn with_template(mut self, template: impl Template + 'static) -> Self {
        self.add_template(template);
        self
    }

    pub fn templates(&self) -> &[TemplateRef] {
        &self.templates
    }

    /// Template with the given family name.
    pub fn template(&self, name: &str) -> Option<&TemplateRef> {
        self.templates.iter().find(|t| t.name() == name)
    }

    fn unroll_one(&self, seed: &Variable) -> Vec<FactorRef> {
        self.templates.iter().flat_map(|t| t.unroll(seed)).collect()
    }
}

impl Model for TemplateModel {
    fn factors_with(&self, variables: &[Variable], mode: NeighborhoodMode) -> Vec<FactorRef> {
        let query = query_ids(variables);
        let unrolled: Vec<Vec<FactorRef>> = if variables.len() >= self.parallel_threshold {
            variables.par_iter().map(|v| self.unroll_one(v)).collect()
        } else {
            variables.iter().map(|v| self.unroll_one(v)).collect()
        };

        let mut collector = FactorCollector::new();
        collector.extend(
            unrolled
                .into_iter()
                .flatten()
                .filter(|f| mode.admits(f.as_ref(), &query)),
        );
        let factors = collector.into_vec();
        trace!(
            event = "factors_query",
            variables = variables.len(),
            factors = factors.len(),
            ?mode,
        );
        factors
    }

    fn default_mode(&self) -> NeighborhoodMode {
        self.neighborhood
    }

    fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}
