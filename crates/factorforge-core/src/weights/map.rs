//! Auxiliary tensors keyed by weights identity.

use std::collections::BTreeMap;

use super::{TensorSet, Weights, WeightsKey};
use crate::tensor::Tensor;

/// Same-keyed parallel structure to a `WeightsSet`, such as a gradient.
///
/// Holds only its own tensors, never the parameters themselves. Tensors are
/// created eagerly by [`WeightsSet::blank_map`](super::WeightsSet::blank_map)
/// or lazily by [`tensor_mut`](Self::tensor_mut); either way they take the
/// shape of their weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightsMap {
    tensors: BTreeMap<WeightsKey, Tensor>,
}

impl WeightsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: WeightsKey, tensor: Tensor) -> Option<Tensor> {
        self.tensors.insert(key, tensor)
    }

    pub fn get(&self, key: &WeightsKey) -> Option<&Tensor> {
        self.tensors.get(key)
    }

    pub fn remove(&mut self, key: &WeightsKey) -> Option<Tensor> {
        self.tensors.remove(key)
    }

    /// Tensor for `weights`, created as zeros of the weights' shape if absent.
    pub fn tensor_mut(&mut self, weights: &Weights) -> &mut Tensor {
        self.tensors
            .entry(weights.key().clone())
            .or_insert_with(|| Tensor::zeros(&weights.shape()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeightsKey, &Tensor)> {
        self.tensors.iter()
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Sets every tensor to zero, keeping keys and shapes.
    pub fn zero(&mut self) {
        self.tensors.values_mut().for_each(Tensor::zero);
    }
}

impl TensorSet for WeightsMap {
    fn keys(&self) -> Vec<WeightsKey> {
        self.tensors.keys().cloned().collect()
    }

    fn with_tensor<R>(&self, key: &WeightsKey, f: impl FnOnce(&Tensor) -> R) -> Option<R> {
        self.tensors.get(key).map(f)
    }

    fn with_tensor_mut<R>(
        &mut self,
        key: &WeightsKey,
        f: impl FnOnce(&mut Tensor) -> R,
    ) -> Option<R> {
        self.tensors.get_mut(key).map(f)
    }
}
