//! Assignments: alternative variable-to-value lenses.
//!
//! Lookup of a variable an assignment does not bind is defined per kind, and
//! the kinds deliberately disagree:
//!
//! | Kind | Unbound lookup |
//! |------|----------------|
//! | [`GlobalAssignment`] | never unbound, reads the variable's current value |
//! | [`FixedAssignment`] | falls back to the variable's current value |
//! | [`MapAssignment`] | fails with `VariableNotBound` |
//! | [`TargetAssignment`] | reads the target, fails with `NoTarget` |

use std::collections::HashMap;

use super::{VarId, Variable};
use crate::diff::DiffList;
use crate::domain::not_in_domain;
use crate::error::{FactorForgeError, Result};
use crate::value::Value;

/// A function from variables to values.
pub trait Assignment: Send + Sync {
    /// Value of `variable` under this assignment.
    fn value(&self, variable: &Variable) -> Result<Value>;

    /// Returns true if this assignment binds `variable` itself, as opposed to
    /// falling back or failing.
    fn binds(&self, variable: &Variable) -> bool;
}

/// The global assignment: reads each variable's current value.
///
/// Stateless; its storage is the variables themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalAssignment;

impl Assignment for GlobalAssignment {
    fn value(&self, variable: &Variable) -> Result<Value> {
        Ok(variable.value())
    }

    fn binds(&self, _variable: &Variable) -> bool {
        true
    }
}

fn validate(variable: &Variable, value: &Value) -> Result<()> {
    if variable.domain().contains(value) {
        Ok(())
    } else {
        Err(not_in_domain(variable.domain().as_ref(), value))
    }
}

/// An assignment over a fixed set of `N` variables.
///
/// Variables outside the fixed set read their current global value.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use factorforge_core::{Assignment, Assignment2, DiscreteDomain, Value, Variable};
///
/// let d = Arc::new(DiscreteDomain::new("d", 3));
/// let x = Variable::new(d.clone(), Value::Discrete(0)).unwrap();
/// let y = Variable::new(d.clone(), Value::Discrete(0)).unwrap();
/// let z = Variable::new(d, Value::Discrete(2)).unwrap();
///
/// let a = Assignment2::new([(x.clone(), Value::Discrete(1)), (y, Value::Discrete(1))]).unwrap();
/// assert_eq!(a.value(&x).unwrap(), Value::Discrete(1));
/// assert_eq!(a.value(&z).unwrap(), Value::Discrete(2));
/// ```
#[derive(Debug, Clone)]
pub struct FixedAssignment<const N: usize> {
    variables: [Variable; N],
    values: [Value; N],
}

pub type Assignment1 = FixedAssignment<1>;
pub type Assignment2 = FixedAssignment<2>;
pub type Assignment3 = FixedAssignment<3>;
pub type Assignment4 = FixedAssignment<4>;

impl<const N: usize> FixedAssignment<N> {
    /// Creates a fixed assignment from `(variable, value)` pairs.
    ///
    /// # Errors
    ///
    /// `ValueNotInDomain` if a value is outside its variable's domain.
    pub fn new(bindings: [(Variable, Value); N]) -> Result<Self> {
        for (variable, value) in &bindings {
            validate(variable, value)?;
        }
        let variables = std::array::from_fn(|i| bindings[i].0.clone());
        let values = std::array::from_fn(|i| bindings[i].1.clone());
        Ok(Self { variables, values })
    }

    pub fn variables(&self) -> &[Variable; N] {
        &self.variables
    }

    pub fn values(&self) -> &[Value; N] {
        &self.values
    }
}

impl<const N: usize> Assignment for FixedAssignment<N> {
    fn value(&self, variable: &Variable) -> Result<Value> {
        // Later bindings win when a variable appears twice.
        match self.variables.iter().rposition(|v| v == variable) {
            Some(i) => Ok(self.values[i].clone()),
            None => Ok(variable.value()),
        }
    }

    fn binds(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }
}

/// An open, map-backed assignment.
///
/// Looking up a variable it does not bind fails with `VariableNotBound`.
#[derive(Debug, Clone, Default)]
pub struct MapAssignment {
    bindings: HashMap<VarId, (Variable, Value)>,
}

impl MapAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `variable` to `value`, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// `ValueNotInDomain` if `value` is outside the variable's domain.
    pub fn set(&mut self, variable: &Variable, value: Value) -> Result<()> {
        validate(variable, &value)?;
        self.bindings
            .insert(variable.id(), (variable.clone(), value));
        Ok(())
    }

    /// Removes the binding of `variable`, returning its value.
    pub fn remove(&mut self, variable: &Variable) -> Option<Value> {
        self.bindings.remove(&variable.id()).map(|(_, value)| value)
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.bindings.contains_key(&variable.id())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound variables, ordered by identity.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables: Vec<Variable> =
            self.bindings.values().map(|(v, _)| v.clone()).collect();
        variables.sort_by_key(Variable::id);
        variables
    }

    /// Writes every binding into its variable's global value.
    ///
    /// Changes are recorded in `diff` when supplied.
    pub fn globalize(&self, mut diff: Option<&mut DiffList>) -> Result<()> {
        for variable in self.variables() {
            if let Some((_, value)) = self.bindings.get(&variable.id()) {
                variable.set_value(value.clone(), diff.as_deref_mut())?;
            }
        }
        Ok(())
    }
}

impl Assignment for MapAssignment {
    fn value(&self, variable: &Variable) -> Result<Value> {
        self.bindings
            .get(&variable.id())
            .map(|(_, value)| value.clone())
            .ok_or_else(|| FactorForgeError::VariableNotBound {
                variable: variable.to_string(),
            })
    }

    fn binds(&self, variable: &Variable) -> bool {
        self.contains(variable)
    }
}

/// Reads each variable's target value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetAssignment;

impl Assignment for TargetAssignment {
    fn value(&self, variable: &Variable) -> Result<Value> {
        variable.target_value()
    }

    fn binds(&self, variable: &Variable) -> bool {
        variable.has_target()
    }
}
