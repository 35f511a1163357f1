//! The owning parameter collection.

use std::collections::BTreeMap;

use tracing::debug;

use super::{TensorSet, Weights, WeightsKey, WeightsMap};
use crate::error::Result;
use crate::tensor::Tensor;

/// Default threshold used by [`WeightsSet::converged`].
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 1e-6;

/// The complete parameter vector of a model.
///
/// # Example
///
/// ```
/// use factorforge_core::{Tensor, TensorSet, WeightsSet};
///
/// let mut set = WeightsSet::new();
/// let bias = set.new_weights("bias", &[3]);
/// let transition = set.new_weights("transition", &[3, 3]);
///
/// let mut gradient = set.blank_map();
/// gradient.tensor_mut(&bias).set(1, 2.0).unwrap();
/// set.add_scaled(&gradient, 0.5).unwrap();
///
/// assert_eq!(bias.value().get(1), Some(1.0));
/// assert_eq!(set.one_norm(), 1.0);
/// assert_eq!(transition.shape().as_slice(), &[3, 3]);
/// ```
#[derive(Debug)]
pub struct WeightsSet {
    weights: BTreeMap<WeightsKey, Weights>,
    initial_value: f64,
    convergence_threshold: f64,
}

impl Default for WeightsSet {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightsSet {
    pub fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
            initial_value: 0.0,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
        }
    }

    /// Sets the fill value of tensors created by [`new_weights`](Self::new_weights).
    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    /// Sets the threshold used by [`converged`](Self::converged).
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold
    }

    /// Creates and registers weights of `shape`, filled with the initial value.
    pub fn new_weights(&mut self, name: &str, shape: &[usize]) -> Weights {
        self.add(Weights::new(name, Tensor::filled(shape, self.initial_value)))
    }

    /// Registers `weights`, returning a handle to them.
    ///
    /// Registering the same weights twice keeps a single entry.
    pub fn add(&mut self, weights: Weights) -> Weights {
        let key = weights.key().clone();
        let entry = self.weights.entry(key).or_insert_with(|| {
            debug!(
                event = "weights_registered",
                name = weights.name(),
                shape = ?weights.shape().as_slice(),
            );
            weights
        });
        entry.clone()
    }

    pub fn get(&self, key: &WeightsKey) -> Option<&Weights> {
        self.weights.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Weights> {
        self.weights.values()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Total number of parameters across all tensors.
    pub fn parameter_count(&self) -> usize {
        self.weights.values().map(|w| w.read(Tensor::len)).sum()
    }

    /// Zero-filled companion map with one tensor per weights, same shapes.
    pub fn blank_map(&self) -> WeightsMap {
        let mut map = WeightsMap::new();
        for (key, weights) in &self.weights {
            map.insert(key.clone(), weights.read(Tensor::zeros_like));
        }
        map
    }

    /// Dense copy of the current parameters.
    pub fn snapshot(&self) -> WeightsMap {
        let mut map = WeightsMap::new();
        for (key, weights) in &self.weights {
            map.insert(key.clone(), weights.read(Tensor::to_dense));
        }
        map
    }

    /// Overwrites parameters with `other`'s tensors for every shared key.
    pub fn set_from<T: TensorSet + ?Sized>(&mut self, other: &T) -> Result<()> {
        for weights in self.weights.values() {
            if let Some(tensor) = other.with_tensor(weights.key(), Tensor::clone) {
                weights.set(tensor)?;
            }
        }
        Ok(())
    }

    /// Sets every parameter to zero.
    pub fn zero(&mut self) {
        for weights in self.weights.values() {
            weights.write(Tensor::zero);
        }
    }

    /// Returns true if `other` is within the convergence threshold.
    pub fn converged<T: TensorSet + ?Sized>(&self, other: &T) -> bool {
        !self.different(other, self.convergence_threshold)
    }
}

impl TensorSet for WeightsSet {
    fn keys(&self) -> Vec<WeightsKey> {
        self.weights.keys().cloned().collect()
    }

    fn with_tensor<R>(&self, key: &WeightsKey, f: impl FnOnce(&Tensor) -> R) -> Option<R> {
        self.weights.get(key).map(|w| w.read(f))
    }

    fn with_tensor_mut<R>(
        &mut self,
        key: &WeightsKey,
        f: impl FnOnce(&mut Tensor) -> R,
    ) -> Option<R> {
        self.weights.get(key).map(|w| w.write(f))
    }
}
