//! Parameter store.
//!
//! - [`Weights`]: one named, uniquely identified parameter tensor
//! - [`WeightsSet`]: the owning collection forming a model's parameter vector
//! - [`WeightsMap`]: a same-keyed auxiliary collection (gradients, accumulators)
//! - [`TensorSet`]: aggregate vector operations shared by both
//!
//! Aggregates behave as if every tensor were concatenated into one vector,
//! without ever building that concatenation.

mod map;
mod set;
mod tensor_set;


use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{FactorForgeError, Result};
use crate::tensor::{Shape, Tensor};
use crate::value::Value;

pub use map::WeightsMap;
pub use set::WeightsSet;
pub use tensor_set::TensorSet;

/// Identity of a `Weights` instance; the key of every tensor set.
///
/// Ordered by creation, so iteration over tensor sets is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeightsKey {
    id: u64,
    name: Arc<str>,
}

impl WeightsKey {
    fn fresh(name: &str) -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self {
            id: NEXT.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for WeightsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

struct WeightsCell {
    key: WeightsKey,
    tensor: RwLock<Tensor>,
}

/// Handle to a named parameter tensor.
///
/// Clones share the tensor. A family holds one handle and its `WeightsSet`
/// another; updates through either are seen by both. The shape is fixed at
/// creation.
#[derive(Clone)]
pub struct Weights {
    cell: Arc<WeightsCell>,
}

impl Weights {
    /// Creates weights under a fresh identity.
    pub fn new(name: &str, tensor: Tensor) -> Self {
        Self {
            cell: Arc::new(WeightsCell {
                key: WeightsKey::fresh(name),
                tensor: RwLock::new(tensor),
            }),
        }
    }

    pub fn key(&self) -> &WeightsKey {
        &self.cell.key
    }

    pub fn name(&self) -> &str {
        self.cell.key.name()
    }

    pub fn shape(&self) -> Shape {
        Shape::from_slice(self.cell.tensor.read().shape())
    }

    /// Copy of the current tensor.
    pub fn value(&self) -> Tensor {
        self.cell.tensor.read().clone()
    }

    /// The current tensor as a variable value.
    pub fn as_value(&self) -> Value {
        Value::Tensor(self.value())
    }

    /// Reads the tensor without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&Tensor) -> R) -> R {
        f(&self.cell.tensor.read())
    }

    /// Mutates the tensor in place.
    pub fn write<R>(&self, f: impl FnOnce(&mut Tensor) -> R) -> R {
        f(&mut self.cell.tensor.write())
    }

    /// Replaces the tensor.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `tensor` has a different shape.
    pub fn set(&self, tensor: Tensor) -> Result<()> {
        let mut current = self.cell.tensor.write();
        if current.shape() != tensor.shape() {
            return Err(FactorForgeError::ShapeMismatch {
                expected: current.shape().to_vec(),
                found: tensor.shape().to_vec(),
            });
        }
        *current = tensor;
        Ok(())
    }

    /// Inner product of the weights with `statistics`.
    pub fn dot(&self, statistics: &Tensor) -> Result<f64> {
        self.cell.tensor.read().dot(statistics)
    }
}

impl PartialEq for Weights {
    fn eq(&self, other: &Self) -> bool {
        self.cell.key == other.cell.key
    }
}

impl Eq for Weights {}

impl fmt::Debug for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Weights")
            .field("key", &self.cell.key)
            .field("shape", &self.shape())
            .finish()
    }
}
