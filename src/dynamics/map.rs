//! Quadratic map f(x) = 1 - a·x²

use ndarray::Array1;

/// Scalar map. NaN and ±∞ propagate by IEEE rules.
#[inline]
pub fn logistic_map(x: f64, a: f64) -> f64 {
    1.0 - a * x.powi(2)
}

/// Elementwise map over a state vector
pub fn logistic_map_array(x: &Array1<f64>, a: f64) -> Array1<f64> {
    x.mapv(|v| logistic_map(v, a))
}
