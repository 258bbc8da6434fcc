//! Radial basis functions and grids for the tail smoother.
//!
//! The smoother regresses on Gaussian bumps placed on an evenly spaced grid
//! over the (log) lag axis.
//!
//! Numerical notes:
//! - The Gaussian is strictly positive definite, so a ridge-penalized design
//!   built from it never loses rank because of the basis itself.
//! - Far from a center the exponent underflows to exactly zero, which is the
//!   desired limit.

/// Smallest width we accept before treating a basis as degenerate.
const WIDTH_EPS: f64 = 1e-12;

/// Gaussian RBF `exp(-((x - center) / width)^2)`.
pub fn gaussian_rbf(x: f64, center: f64, width: f64) -> f64 {
    let width = width.abs().max(WIDTH_EPS);
    let u = (x - center) / width;
    (-u * u).exp()
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
///
/// `steps == 1` yields the midpoint; `steps == 0` yields an empty grid.
pub fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![0.5 * (min + max)],
        _ => {
            let step = (max - min) / (steps as f64 - 1.0);
            (0..steps).map(|i| min + step * i as f64).collect()
        }
    }
}
