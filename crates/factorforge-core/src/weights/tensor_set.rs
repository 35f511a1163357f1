//! Aggregate operations over keyed tensor collections.

use crate::error::{FactorForgeError, Result};
use crate::tensor::Tensor;

use super::WeightsKey;

/// A collection of tensors keyed by weights identity.
///
/// Aggregates treat the collection as one concatenated vector. Binary
/// aggregates pair tensors by key; keys present on one side only are
/// ignored, except by `distance`, which measures them against zero.
pub trait TensorSet {
    /// Keys in deterministic (creation) order.
    fn keys(&self) -> Vec<WeightsKey>;

    /// Runs `f` on the tensor under `key`, if present.
    fn with_tensor<R>(&self, key: &WeightsKey, f: impl FnOnce(&Tensor) -> R) -> Option<R>;

    /// Runs `f` on the mutable tensor under `key`, if present.
    fn with_tensor_mut<R>(
        &mut self,
        key: &WeightsKey,
        f: impl FnOnce(&mut Tensor) -> R,
    ) -> Option<R>;

    fn contains_key(&self, key: &WeightsKey) -> bool {
        self.with_tensor(key, |_| ()).is_some()
    }

    fn one_norm(&self) -> f64 {
        self.keys()
            .iter()
            .filter_map(|k| self.with_tensor(k, Tensor::one_norm))
            .sum()
    }

    fn two_norm_squared(&self) -> f64 {
        self.keys()
            .iter()
            .filter_map(|k| self.with_tensor(k, Tensor::two_norm_squared))
            .sum()
    }

    fn two_norm(&self) -> f64 {
        self.two_norm_squared().sqrt()
    }

    /// Sum of per-key dot products.
    fn dot<T: TensorSet + ?Sized>(&self, other: &T) -> Result<f64> {
        let mut total = 0.0;
        for key in self.keys() {
            let product = self
                .with_tensor(&key, |a| other.with_tensor(&key, |b| a.dot(b)))
                .flatten();
            if let Some(product) = product {
                total += product?;
            }
        }
        Ok(total)
    }

    /// `self[k] += scale * other[k]` for every key both sides hold.
    ///
    /// All shapes are checked before anything is written, so a mismatch
    /// leaves `self` untouched.
    fn add_scaled<T: TensorSet + ?Sized>(&mut self, other: &T, scale: f64) -> Result<()> {
        let keys = self.keys();
        for key in &keys {
            let mismatch = self
                .with_tensor(key, |a| {
                    other.with_tensor(key, |b| {
                        (a.shape() != b.shape())
                            .then(|| (a.shape().to_vec(), b.shape().to_vec()))
                    })
                })
                .flatten()
                .flatten();
            if let Some((expected, found)) = mismatch {
                return Err(FactorForgeError::ShapeMismatch { expected, found });
            }
        }
        for key in &keys {
            // Copied out first: both sides may share one weights handle.
            let Some(b) = other.with_tensor(key, Tensor::clone) else {
                continue;
            };
            if let Some(result) = self.with_tensor_mut(key, |a| a.add_scaled(&b, scale)) {
                result?;
            }
        }
        Ok(())
    }

    /// Aggregate L1 distance between the two sets.
    ///
    /// Keys missing on one side count as a zero tensor on that side.
    fn distance<T: TensorSet + ?Sized>(&self, other: &T) -> Result<f64> {
        let mut total = 0.0;
        for key in self.keys() {
            let d = self
                .with_tensor(&key, |a| match other.with_tensor(&key, |b| a.l1_distance(b)) {
                    Some(d) => d,
                    None => Ok(a.one_norm()),
                })
                .unwrap_or(Ok(0.0))?;
            total += d;
        }
        for key in other.keys() {
            if !self.contains_key(&key) {
                total += other.with_tensor(&key, Tensor::one_norm).unwrap_or(0.0);
            }
        }
        Ok(total)
    }

    /// Returns true if the aggregate distance exceeds `threshold`.
    ///
    /// Incomparable sets (a shape mismatch under some key) are different.
    fn different<T: TensorSet + ?Sized>(&self, other: &T, threshold: f64) -> bool {
        self.distance(other).map_or(true, |d| d > threshold)
    }
}
