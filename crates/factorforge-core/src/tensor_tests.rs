//! Tests for tensors.

use crate::error::FactorForgeError;
use crate::tensor::Tensor;

#[test]
fn test_zeros_and_shape() {
    let t = Tensor::zeros(&[2, 3]);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.len(), 6);
    assert_eq!(t.rank(), 2);
    assert_eq!(t.sum(), 0.0);

    let s = Tensor::scalar(2.5);
    assert_eq!(s.rank(), 0);
    assert_eq!(s.len(), 1);
    assert_eq!(s.get(0), Some(2.5));
}

#[test]
fn test_from_vec_checks_length() {
    assert!(Tensor::from_vec(&[2, 2], vec![1.0, 2.0, 3.0, 4.0]).is_ok());
    assert!(matches!(
        Tensor::from_vec(&[2, 2], vec![1.0]),
        Err(FactorForgeError::ShapeMismatch { .. })
    ));
    assert!(Tensor::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
}

#[test]
fn test_row_major_indexing() {
    let t = Tensor::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    assert_eq!(t.flat_index(&[1, 0]).unwrap(), 3);
    assert_eq!(t.get_at(&[1, 2]).unwrap(), 6.0);
    assert!(t.get_at(&[2, 0]).is_err());
    assert_eq!(t.get(6), None);
}

#[test]
fn test_coordinate_errors() {
    let t = Tensor::zeros(&[2, 3]);
    assert_eq!(
        t.flat_index(&[1, 3]).unwrap_err(),
        FactorForgeError::TensorIndex { index: 3, len: 3 }
    );
    assert_eq!(
        t.get_at(&[2, 0]).unwrap_err(),
        FactorForgeError::TensorIndex { index: 2, len: 2 }
    );
    assert!(matches!(
        t.flat_index(&[1]),
        Err(FactorForgeError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_dot_dense_and_singleton() {
    let w = Tensor::from_rows(vec![vec![0.5, -1.0], vec![2.0, 3.0]]).unwrap();
    let stat = Tensor::singleton(&[2, 2], 2, 1.0).unwrap();
    assert_eq!(w.dot(&stat).unwrap(), 2.0);
    assert_eq!(stat.dot(&w).unwrap(), 2.0);
    assert_eq!(w.dot(&w).unwrap(), 0.25 + 1.0 + 4.0 + 9.0);
}

#[test]
fn test_dot_shape_mismatch() {
    let a = Tensor::zeros(&[2, 2]);
    let b = Tensor::zeros(&[4]);
    assert_eq!(
        a.dot(&b).unwrap_err(),
        FactorForgeError::ShapeMismatch {
            expected: vec![2, 2],
            found: vec![4],
        }
    );
}

#[test]
fn test_sparse_merges_duplicates() {
    let t = Tensor::sparse(&[5], vec![(3, 1.0), (1, 2.0), (3, 0.5)]).unwrap();
    assert_eq!(t.get(3), Some(1.5));
    assert_eq!(t.get(1), Some(2.0));
    assert_eq!(t.get(0), Some(0.0));
    assert!(Tensor::sparse(&[2], vec![(2, 1.0)]).is_err());
}

#[test]
fn test_add_scaled_densifies() {
    let mut acc = Tensor::sparse_zeros(&[3]);
    let g = Tensor::singleton(&[3], 1, 2.0).unwrap();
    acc.add_scaled(&g, 0.5).unwrap();
    acc.add_scaled(&Tensor::vector(vec![1.0, 1.0, 1.0]), -1.0).unwrap();

    assert!(acc.is_dense());
    assert_eq!(acc.as_slice().unwrap(), &[-1.0, 0.0, -1.0]);
}

#[test]
fn test_norms_and_distance() {
    let a = Tensor::vector(vec![3.0, -4.0]);
    assert_eq!(a.one_norm(), 7.0);
    assert_eq!(a.two_norm(), 5.0);

    let b = Tensor::singleton(&[2], 0, 3.0).unwrap();
    assert_eq!(a.l1_distance(&b).unwrap(), 4.0);
}

#[test]
fn test_set_scale_zero() {
    let mut t = Tensor::singleton(&[2, 2], 0, 1.0).unwrap();
    t.set(3, 4.0).unwrap();
    assert_eq!(t.to_dense().as_slice().unwrap(), &[1.0, 0.0, 0.0, 4.0]);

    t.scale(0.5);
    assert_eq!(t.get(3), Some(2.0));

    t.zero();
    assert_eq!(t.one_norm(), 0.0);
    assert_eq!(t.shape(), &[2, 2]);
    assert!(t.set(4, 1.0).is_err());
}
