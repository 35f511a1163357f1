//! Growable categorical domain.
//!
//! Categories receive the next free index when first interned. Indices are
//! never reassigned. Once frozen, interning an unknown category fails with
//! `DomainFrozen`; known categories still resolve.
//!
//! Growth is serialized through a single write lock, so concurrent callers
//! never race on index allocation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{not_in_domain, out_of_domain, Domain, DomainId};
use crate::error::{FactorForgeError, Result};
use crate::value::Value;

#[derive(Debug, Default)]
struct CategoryIndex {
    categories: Vec<Arc<str>>,
    indices: HashMap<Arc<str>, usize>,
    frozen: bool,
}

/// A growable bijection between category labels and `[0, size)`.
///
/// # Example
///
/// ```
/// use factorforge_core::{CategoricalDomain, Domain, FactorForgeError};
///
/// let pos = CategoricalDomain::new("pos");
/// assert_eq!(pos.intern("NOUN").unwrap(), 0);
/// assert_eq!(pos.intern("VERB").unwrap(), 1);
/// assert_eq!(pos.intern("NOUN").unwrap(), 0);
/// assert_eq!(pos.size(), Some(2));
///
/// pos.freeze();
/// assert!(matches!(
///     pos.intern("ADJ"),
///     Err(FactorForgeError::DomainFrozen { .. })
/// ));
/// ```
#[derive(Debug)]
pub struct CategoricalDomain {
    id: DomainId,
    name: String,
    capacity: Option<usize>,
    state: RwLock<CategoryIndex>,
}

impl CategoricalDomain {
    /// Creates an empty, unfrozen domain without a category limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DomainId::next(),
            name: name.into(),
            capacity: None,
            state: RwLock::new(CategoryIndex::default()),
        }
    }

    /// Creates an empty domain that refuses to grow past `capacity` categories.
    pub fn with_capacity_limit(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new(name)
        }
    }

    /// Creates a domain pre-populated with `categories` in order.
    pub fn from_categories<I, C>(name: impl Into<String>, categories: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let domain = Self::new(name);
        for category in categories {
            domain.intern(category.as_ref())?;
        }
        Ok(domain)
    }

    /// Returns the index of `category`, allocating the next index if unknown.
    ///
    /// # Errors
    ///
    /// `DomainFrozen` if the category is unknown and the domain is frozen;
    /// `DomainCapacity` if the configured category limit is reached.
    pub fn intern(&self, category: &str) -> Result<usize> {
        if let Some(&index) = self.state.read().indices.get(category) {
            return Ok(index);
        }

        let mut state = self.state.write();
        // Another writer may have interned it between the two locks.
        if let Some(&index) = state.indices.get(category) {
            return Ok(index);
        }
        if state.frozen {
            return Err(FactorForgeError::DomainFrozen {
                domain: self.name.clone(),
                category: category.to_string(),
            });
        }
        if let Some(capacity) = self.capacity {
            if state.categories.len() >= capacity {
                return Err(FactorForgeError::DomainCapacity {
                    domain: self.name.clone(),
                    capacity,
                });
            }
        }

        let index = state.categories.len();
        let label: Arc<str> = Arc::from(category);
        state.categories.push(label.clone());
        state.indices.insert(label, index);
        debug!(
            event = "category_interned",
            domain = %self.name,
            category,
            index,
        );
        Ok(index)
    }

    /// Interns `category` and returns it as a value.
    pub fn intern_value(&self, category: &str) -> Result<Value> {
        let index = self.intern(category)?;
        self.value(index)
    }

    /// Index of a known category, without growing the domain.
    pub fn index(&self, category: &str) -> Option<usize> {
        self.state.read().indices.get(category).copied()
    }

    /// Category label at `index`.
    pub fn category(&self, index: usize) -> Result<Arc<str>> {
        let state = self.state.read();
        state
            .categories
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_domain(self, index, state.categories.len()))
    }

    /// Snapshot of all `(index, category)` pairs in index order.
    ///
    /// This is what an external persistence layer stores to rebuild the domain.
    pub fn categories(&self) -> Vec<(usize, Arc<str>)> {
        self.state
            .read()
            .categories
            .iter()
            .cloned()
            .enumerate()
            .collect()
    }

    /// Stops growth; unknown categories fail from now on.
    pub fn freeze(&self) {
        let mut state = self.state.write();
        if !state.frozen {
            state.frozen = true;
            debug!(
                event = "domain_frozen",
                domain = %self.name,
                size = state.categories.len(),
            );
        }
    }

    /// Allows growth again.
    pub fn unfreeze(&self) {
        self.state.write().frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.state.read().frozen
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity
    }
}

impl Domain for CategoricalDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<usize> {
        Some(self.state.read().categories.len())
    }

    fn contains(&self, value: &Value) -> bool {
        match value {
            Value::Category { index, category } => {
                self.state.read().indices.get(category.as_ref()) == Some(index)
            }
            _ => false,
        }
    }

    fn index_of(&self, value: &Value) -> Result<usize> {
        match value {
            Value::Category { index, category } => match self.index(category) {
                Some(found) if found == *index => Ok(found),
                _ => Err(not_in_domain(self, value)),
            },
            _ => Err(not_in_domain(self, value)),
        }
    }

    fn value(&self, index: usize) -> Result<Value> {
        let category = self.category(index)?;
        Ok(Value::Category { index, category })
    }
}
