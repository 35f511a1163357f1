//! Domains: the legal value sets of variables.
//!
//! - `DiscreteDomain`: fixed-size `[0, size)` index range
//! - `BooleanDomain`: `false`/`true` at indices 0 and 1
//! - `IntegerRangeDomain`: integers `[from, to)`
//! - `CategoricalDomain`: growable, freezable category index
//! - `RealDomain`, `TextDomain`: unbounded, not enumerable

mod categorical;
mod discrete;
mod unbounded;

#[cfg(test)]
mod tests;

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{FactorForgeError, Result};
use crate::value::Value;

pub use categorical::CategoricalDomain;
pub use discrete::{BooleanDomain, DiscreteDomain, IntegerRangeDomain};
pub use unbounded::{RealDomain, TextDomain};

/// Shared handle to a domain.
pub type DomainRef = Arc<dyn Domain>;

/// Process-unique identity of a domain instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId(u64);

impl DomainId {
    /// Allocates a fresh identity.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        DomainId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The set of legal values for a variable.
///
/// Enumerable domains are a bijection between `[0, size)` and their values;
/// `index_of` and `value` are mutual inverses on them. Unbounded domains
/// report `None` from `size()` and fail enumeration with `NotEnumerable`.
pub trait Domain: Send + Sync + Debug {
    /// Identity of this domain instance.
    fn id(&self) -> DomainId;

    /// Human-readable domain name.
    fn name(&self) -> &str;

    /// Number of values, or `None` for unbounded domains.
    fn size(&self) -> Option<usize>;

    /// Returns true if `value` is a member of this domain.
    fn contains(&self, value: &Value) -> bool;

    /// Index of `value` within the domain.
    fn index_of(&self, value: &Value) -> Result<usize>;

    /// Value at `index`.
    fn value(&self, index: usize) -> Result<Value>;

    /// Returns true if the domain can be enumerated.
    fn is_enumerable(&self) -> bool {
        self.size().is_some()
    }

    /// All values in index order.
    fn values(&self) -> Result<Vec<Value>> {
        let size = self.size().ok_or_else(|| FactorForgeError::NotEnumerable {
            domain: self.name().to_string(),
        })?;
        (0..size).map(|i| self.value(i)).collect()
    }
}

pub(crate) fn not_in_domain(domain: &dyn Domain, value: &Value) -> FactorForgeError {
    FactorForgeError::ValueNotInDomain {
        domain: domain.name().to_string(),
        value: value.to_string(),
    }
}

pub(crate) fn out_of_domain(domain: &dyn Domain, index: usize, size: usize) -> FactorForgeError {
    FactorForgeError::IndexOutOfDomain {
        domain: domain.name().to_string(),
        index,
        size,
    }
}
