//! Linear-chain fixtures.
//!
//! A `StateChain` is a sequence of discrete state variables sharing one
//! domain, the shape every transition-template test starts from.
//!
//! # Example
//!
//! ```
//! use factorforge_test::chain::StateChain;
//!
//! let chain = StateChain::with_states(2, &[0, 1, 0]);
//! assert_eq!(chain.len(), 3);
//! assert_eq!(chain.states(), vec![0, 1, 0]);
//! ```

use std::sync::Arc;

use factorforge_core::{DiscreteDomain, DomainRef, Value, Variable};

/// A chain of discrete state variables over one shared domain.
#[derive(Debug, Clone)]
pub struct StateChain {
    pub domain: DomainRef,
    pub variables: Vec<Variable>,
}

impl StateChain {
    /// Creates a chain holding `states`, over a domain of `size` states.
    ///
    /// Variables are named `s0`, `s1`, ... in chain order.
    ///
    /// # Panics
    ///
    /// Panics if a state is outside `[0, size)`.
    pub fn with_states(size: usize, states: &[usize]) -> Self {
        let domain: DomainRef = Arc::new(DiscreteDomain::new("state", size));
        let variables = states
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                Variable::builder(domain.clone())
                    .name(format!("s{i}"))
                    .value(Value::Discrete(s))
                    .build()
                    .expect("state within domain")
            })
            .collect();
        Self { domain, variables }
    }

    /// Creates a chain of `len` variables all in state 0.
    pub fn zeros(size: usize, len: usize) -> Self {
        Self::with_states(size, &vec![0; len])
    }

    /// Creates a chain with current `states` and gold `targets`.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or a state is out of range.
    pub fn with_targets(size: usize, states: &[usize], targets: &[usize]) -> Self {
        assert_eq!(states.len(), targets.len(), "one target per state");
        let domain: DomainRef = Arc::new(DiscreteDomain::new("state", size));
        let variables = states
            .iter()
            .zip(targets)
            .enumerate()
            .map(|(i, (&s, &t))| {
                Variable::builder(domain.clone())
                    .name(format!("s{i}"))
                    .value(Value::Discrete(s))
                    .target(Value::Discrete(t))
                    .build()
                    .expect("state within domain")
            })
            .collect();
        Self { domain, variables }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variable at position `i`.
    pub fn at(&self, i: usize) -> &Variable {
        &self.variables[i]
    }

    /// Current state indices in chain order.
    pub fn states(&self) -> Vec<usize> {
        self.variables
            .iter()
            .map(|v| v.index().unwrap_or(usize::MAX))
            .collect()
    }
}
