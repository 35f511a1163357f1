//! Reversible mutation history.
//!
//! A `Diff` records one variable's transition from an old value to a new
//! one. A `DiffList` groups the diffs of one proposed change:
//!
//! ```text
//! let mut diff = DiffList::new();
//! x.set_value(v1, Some(&mut diff))?;   // records (old -> v1)
//! y.set_value(v2, Some(&mut diff))?;   // records (old -> v2)
//! diff.undo_all();                     // reverse order
//! ```
//!
//! Diffs hold handles to their variables, not ownership of their values.
//! Undo restores exactly the pre-change state only if no unrecorded mutation
//! touched those variables in between; that is the caller's responsibility
//! and is not detected.

use tracing::trace;

use crate::value::Value;
use crate::variable::Variable;

/// One recorded variable transition.
#[derive(Debug, Clone)]
pub struct Diff {
    variable: Variable,
    old_value: Value,
    new_value: Value,
}

impl Diff {
    pub fn new(variable: Variable, old_value: Value, new_value: Value) -> Self {
        Self {
            variable,
            old_value,
            new_value,
        }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn old_value(&self) -> &Value {
        &self.old_value
    }

    pub fn new_value(&self) -> &Value {
        &self.new_value
    }

    /// Restores the old value.
    pub fn undo(&self) {
        self.variable.store(self.old_value.clone());
    }

    /// Reapplies the new value.
    pub fn redo(&self) {
        self.variable.store(self.new_value.clone());
    }
}

/// An ordered, append-only sequence of diffs forming one atomic change.
#[derive(Debug, Clone, Default)]
pub struct DiffList {
    diffs: Vec<Diff>,
}

impl DiffList {
    pub fn new() -> Self {
        Self {
            diffs: Vec::with_capacity(8),
        }
    }

    /// Appends a diff.
    pub fn append(&mut self, diff: Diff) {
        self.diffs.push(diff);
    }

    /// Undoes every diff in reverse insertion order.
    pub fn undo_all(&self) {
        trace!(event = "diff_undo", count = self.diffs.len());
        for diff in self.diffs.iter().rev() {
            diff.undo();
        }
    }

    /// Reapplies every diff in insertion order.
    pub fn redo_all(&self) {
        trace!(event = "diff_redo", count = self.diffs.len());
        for diff in &self.diffs {
            diff.redo();
        }
    }

    /// Distinct variables touched, in first-seen order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = std::collections::HashSet::with_capacity(self.diffs.len());
        self.diffs
            .iter()
            .filter(|d| seen.insert(d.variable.id()))
            .map(|d| d.variable.clone())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diff> {
        self.diffs.iter()
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Forgets all recorded diffs without touching the variables.
    pub fn clear(&mut self) {
        self.diffs.clear();
    }
}

impl<'a> IntoIterator for &'a DiffList {
    type Item = &'a Diff;
    type IntoIter = std::slice::Iter<'a, Diff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}
