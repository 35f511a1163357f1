//! FactorForge Model - factors, families, templates and models
//!
//! Built on the substrate in `factorforge-core`:
//! - [`Factor`]: a scoring function over an ordered tuple of neighbors
//! - [`Family`]: a shared potential (and parameters) for many factors
//! - [`Template`]: a family plus an unroll strategy that discovers its
//!   factors from a seed variable
//! - [`Model`]: the read surface inference uses, `factors_with(vars, mode)`

pub mod factor;
pub mod family;
pub mod model;
pub mod template;

pub use factor::{Factor, FactorKey, FactorRef, FamilyFactor, FamilyId};
pub use family::{
    DiscreteStatistics, DotPotential, Family, FnPotential, FnStatistics, Potential, Statistics,
    StatisticsPotential,
};
pub use model::{
    CombinedModel, ItemizedModel, Model, ModelExt, NeighborhoodMode, TemplateModel,
    DEFAULT_PARALLEL_THRESHOLD,
};
pub use template::{
    Adjacency, AdjacencyUnroller, AlignedUnroller, ChainUnroller, DomainUnroller, FamilyTemplate,
    FnUnroller, Sequences, Template, TemplateRef, Unroller,
};
