//! Builder module for constructing factor graphs from configuration
//!
//! This module provides the wiring between configuration types and the
//! domain, parameter and model implementations.

use std::sync::Arc;

use factorforge_config::{ConfigError, FactorGraphConfig, NeighborhoodConfig};
use factorforge_core::{
    CategoricalDomain, DiscreteDomain, Domain, DomainRef, FactorForgeError, TensorSet, Variable,
    Weights, WeightsSet,
};
use factorforge_model::{
    CombinedModel, Factor, FactorRef, ItemizedModel, Model, NeighborhoodMode, Template,
    TemplateModel,
};
use thiserror::Error;
use tracing::{info, warn};

/// Error building a factor graph.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] FactorForgeError),
}

/// Maps the configured neighborhood to the model's.
pub fn neighborhood_mode(config: NeighborhoodConfig) -> NeighborhoodMode {
    match config {
        NeighborhoodConfig::Any => NeighborhoodMode::Any,
        NeighborhoodConfig::Contained => NeighborhoodMode::Contained,
    }
}

/// Builder for a [`FactorGraph`].
///
/// Categorical domains, weights and templates created through the builder
/// follow the configuration it was made from.
///
/// # Example
///
/// ```
/// use factorforge::prelude::*;
///
/// let config = FactorGraphConfig::new().with_freeze_on_build(true);
/// let mut builder = GraphBuilder::from_config(&config).unwrap();
///
/// let tags = builder.categorical_domain("tag");
/// tags.intern("NOUN").unwrap();
///
/// let graph = builder.finish();
/// assert!(tags.is_frozen());
/// assert!(graph.factors(&[]).is_empty());
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    config: FactorGraphConfig,
    domains: Vec<Arc<CategoricalDomain>>,
    weights: WeightsSet,
    templates: TemplateModel,
    factors: ItemizedModel,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::with_config(FactorGraphConfig::default())
    }
}

impl GraphBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from `config`.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Config` if the configuration fails validation.
    pub fn from_config(config: &FactorGraphConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let mut config = config.clone();
        if !config.weights.initial_value.is_finite() {
            warn!(
                event = "config_substituted",
                field = "weights.initial_value",
                value = config.weights.initial_value,
                substitute = 0.0,
            );
            config.weights.initial_value = 0.0;
        }
        Ok(Self::with_config(config))
    }

    fn with_config(config: FactorGraphConfig) -> Self {
        let weights = WeightsSet::new()
            .with_initial_value(config.weights.initial_value)
            .with_convergence_threshold(config.weights.convergence_threshold);
        let templates = TemplateModel::new()
            .with_neighborhood(neighborhood_mode(config.scoring.neighborhood))
            .with_parallel_threshold(config.scoring.parallel_threshold);
        let factors =
            ItemizedModel::new().with_neighborhood(neighborhood_mode(config.scoring.neighborhood));
        Self {
            config,
            domains: Vec::new(),
            weights,
            templates,
            factors,
        }
    }

    pub fn config(&self) -> &FactorGraphConfig {
        &self.config
    }

    /// Creates a growable categorical domain with the configured limit.
    pub fn categorical_domain(&mut self, name: &str) -> Arc<CategoricalDomain> {
        let domain = Arc::new(match self.config.domain.max_categories {
            Some(limit) => CategoricalDomain::with_capacity_limit(name, limit),
            None => CategoricalDomain::new(name),
        });
        self.domains.push(domain.clone());
        domain
    }

    /// Creates a categorical domain pre-populated with `categories`.
    ///
    /// # Errors
    ///
    /// `DomainCapacity` if the categories exceed the configured limit.
    pub fn categorical_domain_from<I, C>(
        &mut self,
        name: &str,
        categories: I,
    ) -> Result<Arc<CategoricalDomain>, BuildError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let domain = self.categorical_domain(name);
        for category in categories {
            domain.intern(category.as_ref())?;
        }
        Ok(domain)
    }

    /// Creates a fixed-size discrete domain.
    pub fn discrete_domain(&self, name: &str, size: usize) -> DomainRef {
        Arc::new(DiscreteDomain::new(name, size))
    }

    /// Creates weights filled with the configured initial value.
    pub fn new_weights(&mut self, name: &str, shape: &[usize]) -> Weights {
        self.weights.new_weights(name, shape)
    }

    /// Registers existing weights with the graph's parameter store.
    pub fn add_weights(&mut self, weights: Weights) -> Weights {
        self.weights.add(weights)
    }

    pub fn add_template(&mut self, template: impl Template + 'static) -> &mut Self {
        self.templates.add_template(template);
        self
    }

    /// Registers an explicit factor. Returns false on a duplicate key.
    pub fn add_factor(&mut self, factor: impl Factor + 'static) -> bool {
        self.factors.add(factor)
    }

    /// Finishes the graph, freezing categorical domains if configured.
    pub fn finish(self) -> FactorGraph {
        if self.config.domain.freeze_on_build {
            self.domains.iter().for_each(|d| d.freeze());
        }
        info!(
            event = "graph_built",
            domains = self.domains.len(),
            weights = self.weights.len(),
            parameters = self.weights.parameter_count(),
            templates = self.templates.templates().len(),
            factors = self.factors.len(),
        );
        let neighborhood = neighborhood_mode(self.config.scoring.neighborhood);
        let model = CombinedModel::new()
            .with_neighborhood(neighborhood)
            .with(self.factors)
            .with(self.templates);
        FactorGraph {
            config: self.config,
            domains: self.domains,
            weights: self.weights,
            model,
        }
    }
}

/// A finished factor graph: its domains, parameters and model.
///
/// Implements [`Model`] by delegating to the explicit factors and templates
/// registered while building.
#[derive(Debug)]
pub struct FactorGraph {
    config: FactorGraphConfig,
    domains: Vec<Arc<CategoricalDomain>>,
    weights: WeightsSet,
    model: CombinedModel,
}

impl FactorGraph {
    pub fn config(&self) -> &FactorGraphConfig {
        &self.config
    }

    /// Categorical domains created by the builder.
    pub fn domains(&self) -> &[Arc<CategoricalDomain>] {
        &self.domains
    }

    /// Categorical domain with the given name.
    pub fn domain(&self, name: &str) -> Option<&Arc<CategoricalDomain>> {
        self.domains.iter().find(|d| d.name() == name)
    }

    pub fn weights(&self) -> &WeightsSet {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut WeightsSet {
        &mut self.weights
    }

    /// Returns true if the parameters are within the configured threshold
    /// of `previous`.
    pub fn converged<T: TensorSet + ?Sized>(&self, previous: &T) -> bool {
        self.weights.converged(previous)
    }

    pub fn model(&self) -> &CombinedModel {
        &self.model
    }
}

impl Model for FactorGraph {
    fn factors_with(&self, variables: &[Variable], mode: NeighborhoodMode) -> Vec<FactorRef> {
        self.model.factors_with(variables, mode)
    }

    fn default_mode(&self) -> NeighborhoodMode {
        self.model.default_mode()
    }

    fn parallel_threshold(&self) -> usize {
        self.model.parallel_threshold()
    }
}
