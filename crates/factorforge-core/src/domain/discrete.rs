//! Fixed-size enumerable domains.

use super::{not_in_domain, out_of_domain, Domain, DomainId};
use crate::error::Result;
use crate::value::Value;

/// A fixed-size domain of `Value::Discrete(i)` for `i` in `[0, size)`.
///
/// # Example
///
/// ```
/// use factorforge_core::{DiscreteDomain, Domain, Value};
///
/// let states = DiscreteDomain::new("state", 3);
/// assert_eq!(states.size(), Some(3));
/// assert_eq!(states.value(2).unwrap(), Value::Discrete(2));
/// assert_eq!(states.index_of(&Value::Discrete(1)).unwrap(), 1);
/// assert!(states.value(3).is_err());
/// ```
#[derive(Debug)]
pub struct DiscreteDomain {
    id: DomainId,
    name: String,
    size: usize,
}

impl DiscreteDomain {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            id: DomainId::next(),
            name: name.into(),
            size,
        }
    }
}

impl Domain for DiscreteDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<usize> {
        Some(self.size)
    }

    fn contains(&self, value: &Value) -> bool {
        matches!(value, Value::Discrete(i) if *i < self.size)
    }

    fn index_of(&self, value: &Value) -> Result<usize> {
        match value {
            Value::Discrete(i) if *i < self.size => Ok(*i),
            _ => Err(not_in_domain(self, value)),
        }
    }

    fn value(&self, index: usize) -> Result<Value> {
        if index < self.size {
            Ok(Value::Discrete(index))
        } else {
            Err(out_of_domain(self, index, self.size))
        }
    }
}

/// The two-valued boolean domain.
#[derive(Debug)]
pub struct BooleanDomain {
    id: DomainId,
    name: String,
}

impl BooleanDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DomainId::next(),
            name: name.into(),
        }
    }
}

impl Domain for BooleanDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<usize> {
        Some(2)
    }

    fn contains(&self, value: &Value) -> bool {
        matches!(value, Value::Boolean(_))
    }

    fn index_of(&self, value: &Value) -> Result<usize> {
        match value {
            Value::Boolean(b) => Ok(usize::from(*b)),
            _ => Err(not_in_domain(self, value)),
        }
    }

    fn value(&self, index: usize) -> Result<Value> {
        match index {
            0 => Ok(Value::Boolean(false)),
            1 => Ok(Value::Boolean(true)),
            _ => Err(out_of_domain(self, index, 2)),
        }
    }
}

/// Integers in `[from, to)`; index `i` maps to `from + i`.
#[derive(Debug)]
pub struct IntegerRangeDomain {
    id: DomainId,
    name: String,
    from: i64,
    to: i64,
}

impl IntegerRangeDomain {
    /// Creates a range domain. An inverted range is empty.
    pub fn new(name: impl Into<String>, from: i64, to: i64) -> Self {
        Self {
            id: DomainId::next(),
            name: name.into(),
            from,
            to: to.max(from),
        }
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> i64 {
        self.from
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> i64 {
        self.to
    }

    fn len(&self) -> usize {
        usize::try_from(self.to.abs_diff(self.from)).unwrap_or(usize::MAX)
    }
}

impl Domain for IntegerRangeDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }

    fn contains(&self, value: &Value) -> bool {
        matches!(value, Value::Integer(i) if (self.from..self.to).contains(i))
    }

    fn index_of(&self, value: &Value) -> Result<usize> {
        match value {
            Value::Integer(i) if (self.from..self.to).contains(i) => {
                usize::try_from(i.abs_diff(self.from)).map_err(|_| not_in_domain(self, value))
            }
            _ => Err(not_in_domain(self, value)),
        }
    }

    fn value(&self, index: usize) -> Result<Value> {
        let size = self.len();
        if index >= size {
            return Err(out_of_domain(self, index, size));
        }
        u64::try_from(index)
            .ok()
            .and_then(|offset| self.from.checked_add_unsigned(offset))
            .map(Value::Integer)
            .ok_or_else(|| out_of_domain(self, index, size))
    }
}
