//! Variables and assignments.
//!
//! A `Variable` is an identity-distinct mutable cell holding exactly one
//! current value (its global value) and, optionally, a target value fixed at
//! construction. Handles are cheap to clone; clones refer to the same cell.
//!
//! Two comparisons exist and mean different things:
//! - `==` / `Hash`: identity, "is this the same cell"
//! - [`Variable::value_eq`]: "do these cells currently hold equal values"

mod assignment;


use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::diff::{Diff, DiffList};
use crate::domain::{not_in_domain, DomainRef};
use crate::error::{FactorForgeError, Result};
use crate::value::Value;

pub use assignment::{
    Assignment, Assignment1, Assignment2, Assignment3, Assignment4, FixedAssignment,
    GlobalAssignment, MapAssignment, TargetAssignment,
};

/// Process-unique identity of a variable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        VarId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric identity.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

struct VariableCell {
    id: VarId,
    name: Option<String>,
    domain: DomainRef,
    value: RwLock<Value>,
    target: Option<Value>,
}

/// Handle to a mutable variable cell.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use factorforge_core::{DiffList, DiscreteDomain, Value, Variable};
///
/// let domain = Arc::new(DiscreteDomain::new("state", 3));
/// let x = Variable::new(domain, Value::Discrete(0)).unwrap();
///
/// let mut diff = DiffList::new();
/// x.set_value(Value::Discrete(2), Some(&mut diff)).unwrap();
/// assert_eq!(x.value(), Value::Discrete(2));
///
/// diff.undo_all();
/// assert_eq!(x.value(), Value::Discrete(0));
/// ```
#[derive(Clone)]
pub struct Variable {
    cell: Arc<VariableCell>,
}

impl Variable {
    /// Creates a variable holding `value`, without a target.
    ///
    /// # Errors
    ///
    /// `ValueNotInDomain` if `value` is not a member of `domain`.
    pub fn new(domain: DomainRef, value: Value) -> Result<Self> {
        VariableBuilder::new(domain).value(value).build()
    }

    /// Creates a variable with a target (gold-standard) value.
    pub fn with_target(domain: DomainRef, value: Value, target: Value) -> Result<Self> {
        VariableBuilder::new(domain)
            .value(value)
            .target(target)
            .build()
    }

    /// Starts building a variable over `domain`.
    pub fn builder(domain: DomainRef) -> VariableBuilder {
        VariableBuilder::new(domain)
    }

    pub fn id(&self) -> VarId {
        self.cell.id
    }

    pub fn name(&self) -> Option<&str> {
        self.cell.name.as_deref()
    }

    pub fn domain(&self) -> &DomainRef {
        &self.cell.domain
    }

    /// Returns the current global value.
    pub fn value(&self) -> Value {
        self.cell.value.read().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.cell.value.read())
    }

    /// Discrete index of the current value, if it has one.
    pub fn index(&self) -> Option<usize> {
        self.cell.value.read().index()
    }

    /// Sets the current value.
    ///
    /// When `diff` is supplied, a `Diff` capturing the transition is appended
    /// before the value is applied; otherwise the mutation is unrecorded.
    /// Setting the value the variable already holds records nothing.
    ///
    /// # Errors
    ///
    /// `ValueNotInDomain` if `value` is not a member of this variable's domain.
    pub fn set_value(&self, value: Value, diff: Option<&mut DiffList>) -> Result<()> {
        if !self.cell.domain.contains(&value) {
            return Err(not_in_domain(self.cell.domain.as_ref(), &value));
        }

        let mut current = self.cell.value.write();
        if *current == value {
            return Ok(());
        }
        if let Some(diff) = diff {
            diff.append(Diff::new(self.clone(), current.clone(), value.clone()));
        }
        *current = value;
        Ok(())
    }

    // Raw store used by undo/redo; the value was validated when first set.
    pub(crate) fn store(&self, value: Value) {
        *self.cell.value.write() = value;
    }

    pub fn has_target(&self) -> bool {
        self.cell.target.is_some()
    }

    /// Returns the target value.
    ///
    /// # Errors
    ///
    /// `NoTarget` if the variable was created without one.
    pub fn target_value(&self) -> Result<Value> {
        self.cell
            .target
            .clone()
            .ok_or_else(|| FactorForgeError::NoTarget {
                variable: self.to_string(),
            })
    }

    /// Returns true if the current value equals the target value.
    ///
    /// Variables without a target are never at target.
    pub fn is_at_target(&self) -> bool {
        match &self.cell.target {
            Some(target) => *self.cell.value.read() == *target,
            None => false,
        }
    }

    /// Sets the current value to the target value.
    pub fn set_to_target(&self, diff: Option<&mut DiffList>) -> Result<()> {
        let target = self.target_value()?;
        self.set_value(target, diff)
    }

    /// Value equality: true if both cells currently hold equal values.
    ///
    /// This is not identity; use `==` to ask whether two handles are the
    /// same cell.
    pub fn value_eq(&self, other: &Variable) -> bool {
        if self == other {
            return true;
        }
        *self.cell.value.read() == *other.cell.value.read()
    }

    /// Returns true if both handles refer to the same cell.
    pub fn same_cell(&self, other: &Variable) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.cell.id == other.cell.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.id.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cell.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.cell.id),
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("id", &self.cell.id)
            .field("name", &self.cell.name)
            .field("domain", &self.cell.domain.name())
            .field("value", &*self.cell.value.read())
            .field("target", &self.cell.target)
            .finish()
    }
}

/// Builder for variables.
///
/// If no initial value is given, enumerable domains start at index 0.
#[derive(Debug)]
pub struct VariableBuilder {
    domain: DomainRef,
    name: Option<String>,
    value: Option<Value>,
    target: Option<Value>,
}

impl VariableBuilder {
    pub fn new(domain: DomainRef) -> Self {
        Self {
            domain,
            name: None,
            value: None,
            target: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn target(mut self, target: Value) -> Self {
        self.target = Some(target);
        self
    }

    /// Builds the variable, validating the initial and target values.
    ///
    /// # Errors
    ///
    /// `ValueNotInDomain` for a value outside the domain; `NotEnumerable` or
    /// `IndexOutOfDomain` when no value was given and the domain has no
    /// first element.
    pub fn build(self) -> Result<Variable> {
        let value = match self.value {
            Some(value) => value,
            None => self.domain.value(0)?,
        };
        if !self.domain.contains(&value) {
            return Err(not_in_domain(self.domain.as_ref(), &value));
        }
        if let Some(target) = &self.target {
            if !self.domain.contains(target) {
                return Err(not_in_domain(self.domain.as_ref(), target));
            }
        }

        Ok(Variable {
            cell: Arc::new(VariableCell {
                id: VarId::next(),
                name: self.name,
                domain: self.domain,
                value: RwLock::new(value),
                target: self.target,
            }),
        })
    }
}
