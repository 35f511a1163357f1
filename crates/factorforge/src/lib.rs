//! FactorForge - factor graph models in Rust
//!
//! Variables over domains, reversible diffs, parameter stores, and
//! factors discovered on demand by templates.
//!
//! # Example
//!
//! ```rust
//! use factorforge::prelude::*;
//!
//! let mut builder = GraphBuilder::new();
//! let states = builder.discrete_domain("state", 2);
//! let vars: Vec<Variable> = [0, 1, 0]
//!     .iter()
//!     .map(|&s| Variable::new(states.clone(), Value::Discrete(s)).unwrap())
//!     .collect();
//!
//! let agree = Family::from_fn("agree", |v: &[Value; 2]| {
//!     if v[0] == v[1] { 1.0 } else { 0.0 }
//! });
//! builder.add_template(FamilyTemplate::new(
//!     agree,
//!     ChainUnroller::new(Sequences::single(vars.clone())),
//! ));
//!
//! let graph = builder.finish();
//! assert_eq!(graph.factors(&[vars[1].clone()]).len(), 2);
//! assert_eq!(graph.current_score(&vars).unwrap(), 0.0);
//! ```

pub mod console;

mod builder;
pub use builder::{neighborhood_mode, BuildError, FactorGraph, GraphBuilder};

// Substrate
pub use factorforge_core::{
    Assignment, Assignment1, Assignment2, Assignment3, Assignment4, BooleanDomain,
    CategoricalDomain, Diff, DiffList, DiscreteDomain, Domain, DomainId, DomainRef,
    FactorForgeError, FixedAssignment, GlobalAssignment, IntegerRangeDomain, MapAssignment,
    RealDomain, Result, Shape, TargetAssignment, Tensor, TensorSet, TextDomain, Value, VarId,
    Variable, VariableBuilder, Weights, WeightsKey, WeightsMap, WeightsSet,
};

// Factors, templates and models
pub use factorforge_model::{
    Adjacency, AdjacencyUnroller, AlignedUnroller, ChainUnroller, CombinedModel,
    DiscreteStatistics, DomainUnroller, DotPotential, Factor, FactorKey, FactorRef, Family,
    FamilyFactor, FamilyId, FamilyTemplate, FnPotential, FnStatistics, FnUnroller, ItemizedModel,
    Model, ModelExt, NeighborhoodMode, Potential, Sequences, Statistics, StatisticsPotential,
    Template, TemplateModel, TemplateRef, Unroller,
};

// Configuration
pub use factorforge_config::{
    ConfigError, DomainConfig, FactorGraphConfig, NeighborhoodConfig, ScoringConfig,
    WeightsConfig,
};

pub mod prelude {
    pub use super::{
        CategoricalDomain, DiffList, DiscreteDomain, Domain, DomainRef, Value, Variable, Weights,
        WeightsSet,
    };
    pub use super::{
        ChainUnroller, Factor, Family, FamilyTemplate, Model, ModelExt, NeighborhoodMode,
        Sequences, Template, TemplateModel,
    };
    pub use super::{FactorGraph, FactorGraphConfig, GraphBuilder};
}
