//! Tensors for parameters and sufficient statistics.
//!
//! A `Tensor` is a row-major array of `f64` with a small shape. Storage is
//! dense for parameters and singleton/sparse for statistics, so scoring a
//! one-hot statistic against a dense weight tensor touches a single cell.
//!
//! Binary operations require equal shapes and fail with `ShapeMismatch`
//! otherwise.

use smallvec::SmallVec;

use crate::error::{FactorForgeError, Result};

/// Tensor shape; rank 0 is a scalar.
pub type Shape = SmallVec<[usize; 4]>;

#[derive(Debug, Clone, PartialEq)]
enum Storage {
    Dense(Vec<f64>),
    Singleton { index: usize, value: f64 },
    // Sorted by index, no duplicates.
    Sparse(Vec<(usize, f64)>),
}

/// A numeric tensor.
///
/// # Example
///
/// ```
/// use factorforge_core::Tensor;
///
/// let weights = Tensor::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// let stat = Tensor::singleton(&[2, 2], 3, 1.0).unwrap();
/// assert_eq!(weights.dot(&stat).unwrap(), 1.0);
/// assert_eq!(weights.get_at(&[0, 1]).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    storage: Storage,
}

fn shape_len(shape: &[usize]) -> usize {
    shape.iter().product()
}

impl Tensor {
    /// Dense tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Dense tensor with every element set to `value`.
    pub fn filled(shape: &[usize], value: f64) -> Self {
        Self {
            shape: Shape::from_slice(shape),
            storage: Storage::Dense(vec![value; shape_len(shape)]),
        }
    }

    /// Scalar (rank 0) tensor.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Shape::new(),
            storage: Storage::Dense(vec![value]),
        }
    }

    /// Dense rank-1 tensor.
    pub fn vector(data: Vec<f64>) -> Self {
        Self {
            shape: smallvec::smallvec![data.len()],
            storage: Storage::Dense(data),
        }
    }

    /// Dense tensor from row-major `data`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `data.len()` differs from the shape's element count.
    pub fn from_vec(shape: &[usize], data: Vec<f64>) -> Result<Self> {
        let len = shape_len(shape);
        if data.len() != len {
            return Err(FactorForgeError::ShapeMismatch {
                expected: vec![len],
                found: vec![data.len()],
            });
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            storage: Storage::Dense(data),
        })
    }

    /// Dense matrix from rows of equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let shape = [rows.len(), cols];
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(FactorForgeError::ShapeMismatch {
                expected: vec![cols],
                found: vec![bad.len()],
            });
        }
        Self::from_vec(&shape, rows.into_iter().flatten().collect())
    }

    /// Tensor that is zero everywhere except `value` at flat `index`.
    pub fn singleton(shape: &[usize], index: usize, value: f64) -> Result<Self> {
        let len = shape_len(shape);
        if index >= len {
            return Err(FactorForgeError::TensorIndex { index, len });
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            storage: Storage::Singleton { index, value },
        })
    }

    /// Sparse tensor from `(flat index, value)` entries; duplicates are summed.
    pub fn sparse(shape: &[usize], mut entries: Vec<(usize, f64)>) -> Result<Self> {
        let len = shape_len(shape);
        if let Some(&(index, _)) = entries.iter().find(|(i, _)| *i >= len) {
            return Err(FactorForgeError::TensorIndex { index, len });
        }
        entries.sort_by_key(|(i, _)| *i);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            storage: Storage::Sparse(merged),
        })
    }

    /// All-zero sparse tensor.
    pub fn sparse_zeros(shape: &[usize]) -> Self {
        Self {
            shape: Shape::from_slice(shape),
            storage: Storage::Sparse(Vec::new()),
        }
    }

    /// Dense zeros with this tensor's shape.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(&self.shape)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        shape_len(&self.shape)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_dense(&self) -> bool {
        matches!(self.storage, Storage::Dense(_))
    }

    /// Row-major flat index of `coords`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the coordinate count differs from the rank;
    /// `TensorIndex` if a coordinate is past its dimension.
    pub fn flat_index(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() != self.shape.len() {
            return Err(FactorForgeError::ShapeMismatch {
                expected: self.shape.to_vec(),
                found: coords.to_vec(),
            });
        }
        let mut flat = 0;
        for (&c, &dim) in coords.iter().zip(self.shape.iter()) {
            if c >= dim {
                return Err(FactorForgeError::TensorIndex { index: c, len: dim });
            }
            flat = flat * dim + c;
        }
        Ok(flat)
    }

    /// Element at flat `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        if index >= self.len() {
            return None;
        }
        Some(match &self.storage {
            Storage::Dense(data) => data[index],
            Storage::Singleton { index: i, value } => {
                if *i == index {
                    *value
                } else {
                    0.0
                }
            }
            Storage::Sparse(entries) => entries
                .binary_search_by_key(&index, |(i, _)| *i)
                .map_or(0.0, |pos| entries[pos].1),
        })
    }

    /// Element at `coords`.
    pub fn get_at(&self, coords: &[usize]) -> Result<f64> {
        let index = self.flat_index(coords)?;
        Ok(self.get(index).unwrap_or(0.0))
    }

    /// Sets the element at flat `index`, densifying the storage.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.len();
        match self.dense_mut().get_mut(index) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(FactorForgeError::TensorIndex { index, len }),
        }
    }

    /// Visits every stored element as `(flat index, value)`.
    ///
    /// Dense tensors visit every index; sparse ones only stored entries.
    pub fn for_each_active(&self, mut f: impl FnMut(usize, f64)) {
        match &self.storage {
            Storage::Dense(data) => data.iter().enumerate().for_each(|(i, v)| f(i, *v)),
            Storage::Singleton { index, value } => f(*index, *value),
            Storage::Sparse(entries) => entries.iter().for_each(|(i, v)| f(*i, *v)),
        }
    }

    /// Dense row-major data, if stored densely.
    pub fn as_slice(&self) -> Option<&[f64]> {
        match &self.storage {
            Storage::Dense(data) => Some(data),
            _ => None,
        }
    }

    /// Copy with dense storage.
    pub fn to_dense(&self) -> Self {
        let mut data = vec![0.0; self.len()];
        self.for_each_active(|i, v| data[i] += v);
        Self {
            shape: self.shape.clone(),
            storage: Storage::Dense(data),
        }
    }

    fn dense_mut(&mut self) -> &mut Vec<f64> {
        if !self.is_dense() {
            *self = self.to_dense();
        }
        match &mut self.storage {
            Storage::Dense(data) => data,
            _ => unreachable!("storage was densified above"),
        }
    }

    fn check_shape(&self, other: &Tensor) -> Result<()> {
        if self.shape == other.shape {
            Ok(())
        } else {
            Err(FactorForgeError::ShapeMismatch {
                expected: self.shape.to_vec(),
                found: other.shape.to_vec(),
            })
        }
    }

    /// Inner product.
    pub fn dot(&self, other: &Tensor) -> Result<f64> {
        self.check_shape(other)?;
        // Iterate the sparser side.
        let (sparse, dense) = match (&self.storage, &other.storage) {
            (Storage::Dense(_), _) => (other, self),
            _ => (self, other),
        };
        let mut sum = 0.0;
        sparse.for_each_active(|i, v| {
            if v != 0.0 {
                sum += v * dense.get(i).unwrap_or(0.0);
            }
        });
        Ok(sum)
    }

    /// `self += scale * other`.
    pub fn add_scaled(&mut self, other: &Tensor, scale: f64) -> Result<()> {
        self.check_shape(other)?;
        let data = self.dense_mut();
        other.for_each_active(|i, v| data[i] += scale * v);
        Ok(())
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&mut self, factor: f64) {
        match &mut self.storage {
            Storage::Dense(data) => data.iter_mut().for_each(|v| *v *= factor),
            Storage::Singleton { value, .. } => *value *= factor,
            Storage::Sparse(entries) => entries.iter_mut().for_each(|(_, v)| *v *= factor),
        }
    }

    /// Sets every element to zero, keeping the shape.
    pub fn zero(&mut self) {
        match &mut self.storage {
            Storage::Dense(data) => data.iter_mut().for_each(|v| *v = 0.0),
            _ => self.storage = Storage::Sparse(Vec::new()),
        }
    }

    /// Sum of elements.
    pub fn sum(&self) -> f64 {
        let mut sum = 0.0;
        self.for_each_active(|_, v| sum += v);
        sum
    }

    pub fn one_norm(&self) -> f64 {
        let mut sum = 0.0;
        self.for_each_active(|_, v| sum += v.abs());
        sum
    }

    pub fn two_norm_squared(&self) -> f64 {
        let mut sum = 0.0;
        self.for_each_active(|_, v| sum += v * v);
        sum
    }

    pub fn two_norm(&self) -> f64 {
        self.two_norm_squared().sqrt()
    }

    /// Sum of absolute element-wise differences.
    pub fn l1_distance(&self, other: &Tensor) -> Result<f64> {
        self.check_shape(other)?;
        Ok((0..self.len())
            .map(|i| (self.get(i).unwrap_or(0.0) - other.get(i).unwrap_or(0.0)).abs())
            .sum())
    }
}
