//! Numeric fixtures.

use factorforge_core::Tensor;

/// Tolerance used by [`assert_close`].
pub const EPSILON: f64 = 1e-9;

/// `n x n` identity matrix, the transition weights that reward staying in
/// the same state.
pub fn identity_transitions(n: usize) -> Tensor {
    let mut tensor = Tensor::zeros(&[n, n]);
    for i in 0..n {
        tensor
            .set(i * n + i, 1.0)
            .expect("diagonal index within an n x n tensor");
    }
    tensor
}

/// Asserts that two floats are within [`EPSILON`] of each other.
///
/// # Panics
///
/// Panics with both values when they differ by more than the tolerance.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "expected {expected}, got {actual}"
    );
}
