//! Derivatives for the cascade equations.
//!
//! Forward-mode automatic differentiation with `num-dual` gives exact
//! derivatives of the closed-form stage relations. Forward differences
//! serve the purely numerical update, which treats the residual as a black
//! box.
//!
//! # Example
//!
//! ```
//! use isocascade::autodiff::derivative;
//!
//! // d/dx x^2 at x = 3
//! let (value, slope) = derivative(|x| x * x, 3.0);
//! assert_eq!(value, 9.0);
//! assert_eq!(slope, 6.0);
//! ```

use nalgebra::DMatrix;
use num_dual::*;

/// Value and first derivative of a scalar function at `x`.
pub fn derivative<F>(f: F, x: f64) -> (f64, f64)
where
    F: Fn(Dual64) -> Dual64,
{
    let result = f(Dual64::from(x).derivative());
    (result.re, result.eps)
}

/// Forward-difference Jacobian around `x`, where `f0 = F(x)`.
///
/// Column `j` is perturbed by `rel_step·(1 + |x_j|)`.
pub fn jacobian_forward_difference<F>(f: F, x: &[f64], f0: &[f64], rel_step: f64) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut jac = DMatrix::zeros(f0.len(), x.len());
    let mut shifted = x.to_vec();
    for j in 0..x.len() {
        let h = rel_step * (1.0 + x[j].abs());
        shifted[j] = x[j] + h;
        for (i, (fi, f0i)) in f(&shifted).iter().zip(f0).enumerate() {
            jac[(i, j)] = (fi - f0i) / h;
        }
        shifted[j] = x[j];
    }
    jac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derivative_of_exponential() {
        let (value, slope) = derivative(|x| (x * Dual64::from(2.0)).exp(), 0.5);
        assert_relative_eq!(value, 1.0_f64.exp(), max_relative = 1e-14);
        assert_relative_eq!(slope, 2.0 * 1.0_f64.exp(), max_relative = 1e-14);
    }

    #[test]
    fn test_forward_difference_jacobian() {
        // f(x, y) = [e^x·y, ln y - x]
        let f = |v: &[f64]| vec![v[0].exp() * v[1], v[1].ln() - v[0]];
        let (x, y) = (0.3_f64, 2.0_f64);
        let jac = jacobian_forward_difference(f, &[x, y], &f(&[x, y]), 1e-7);

        assert_eq!(jac.shape(), (2, 2));
        let exact = [[x.exp() * y, x.exp()], [-1.0, 1.0 / y]];
        for (i, row) in exact.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                assert!((jac[(i, j)] - value).abs() < 1e-5, "({i}, {j}): {} vs {value}", jac[(i, j)]);
            }
        }
    }
}
