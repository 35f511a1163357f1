//! Domains that cannot be enumerated.

use super::{Domain, DomainId};
use crate::error::{FactorForgeError, Result};
use crate::value::Value;

fn not_enumerable(domain: &dyn Domain) -> FactorForgeError {
    FactorForgeError::NotEnumerable {
        domain: domain.name().to_string(),
    }
}

/// Real numbers. Integers are not members.
#[derive(Debug)]
pub struct RealDomain {
    id: DomainId,
    name: String,
}

impl RealDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DomainId::next(),
            name: name.into(),
        }
    }
}

impl Domain for RealDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn contains(&self, value: &Value) -> bool {
        matches!(value, Value::Real(_))
    }

    fn index_of(&self, _value: &Value) -> Result<usize> {
        Err(not_enumerable(self))
    }

    fn value(&self, _index: usize) -> Result<Value> {
        Err(not_enumerable(self))
    }
}

/// Free text.
#[derive(Debug)]
pub struct TextDomain {
    id: DomainId,
    name: String,
}

impl TextDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DomainId::next(),
            name: name.into(),
        }
    }
}

impl Domain for TextDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn contains(&self, value: &Value) -> bool {
        matches!(value, Value::Text(_))
    }

    fn index_of(&self, _value: &Value) -> Result<usize> {
        Err(not_enumerable(self))
    }

    fn value(&self, _index: usize) -> Result<Value> {
        Err(not_enumerable(self))
    }
}
