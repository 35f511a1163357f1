//! Sufficient statistics of neighbor-value tuples.

use factorforge_core::{DomainRef, FactorForgeError, Result, Shape, Tensor, Value};

/// Maps an `N`-tuple of neighbor values to a fixed-shape tensor.
pub trait Statistics<const N: usize>: Send + Sync + 'static {
    /// Shape of every tensor this function returns.
    fn shape(&self) -> &[usize];

    fn statistics(&self, values: &[Value; N]) -> Result<Tensor>;
}

/// One-hot statistics over the joint index of `N` discrete values.
///
/// For sizes `[d0, d1]` and values with indices `(i, j)`, the statistic is a
/// `d0 x d1` tensor holding a single `1.0` at `[i, j]`. Sizes are captured at
/// construction, so domains that can grow should be frozen first.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteStatistics<const N: usize> {
    shape: Shape,
}

impl<const N: usize> DiscreteStatistics<N> {
    pub fn new(sizes: [usize; N]) -> Self {
        Self {
            shape: Shape::from_slice(&sizes),
        }
    }

    /// Sizes taken from the current sizes of enumerable domains.
    ///
    /// # Errors
    ///
    /// `NotEnumerable` if any domain is unbounded.
    pub fn from_domains(domains: &[DomainRef; N]) -> Result<Self> {
        let mut sizes = [0; N];
        for (size, domain) in sizes.iter_mut().zip(domains) {
            *size = domain.size().ok_or_else(|| FactorForgeError::NotEnumerable {
                domain: domain.name().to_string(),
            })?;
        }
        Ok(Self::new(sizes))
    }

    /// Row-major joint index of `values`.
    pub fn joint_index(&self, values: &[Value; N]) -> Result<usize> {
        let mut flat = 0;
        for (value, &size) in values.iter().zip(self.shape.iter()) {
            let index = value
                .index()
                .ok_or_else(|| FactorForgeError::ValueNotInDomain {
                    domain: format!("discrete[{size}]"),
                    value: value.to_string(),
                })?;
            if index >= size {
                return Err(FactorForgeError::IndexOutOfDomain {
                    domain: format!("discrete[{size}]"),
                    index,
                    size,
                });
            }
            flat = flat * size + index;
        }
        Ok(flat)
    }
}

impl<const N: usize> Statistics<N> for DiscreteStatistics<N> {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn statistics(&self, values: &[Value; N]) -> Result<Tensor> {
        Tensor::singleton(&self.shape, self.joint_index(values)?, 1.0)
    }
}

/// Statistics computed by a closure.
///
/// The closure must return tensors of the declared shape; a tensor of any
/// other shape is rejected with `ShapeMismatch`.
pub struct FnStatistics<F> {
    shape: Shape,
    statistics: F,
}

impl<F> FnStatistics<F> {
    pub fn new(shape: &[usize], statistics: F) -> Self {
        Self {
            shape: Shape::from_slice(shape),
            statistics,
        }
    }
}

impl<const N: usize, F> Statistics<N> for FnStatistics<F>
where
    F: Fn(&[Value; N]) -> Tensor + Send + Sync + 'static,
{
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn statistics(&self, values: &[Value; N]) -> Result<Tensor> {
        let tensor = (self.statistics)(values);
        if tensor.shape() != self.shape.as_slice() {
            return Err(FactorForgeError::ShapeMismatch {
                expected: self.shape.to_vec(),
                found: tensor.shape().to_vec(),
            });
        }
        Ok(tensor)
    }
}
