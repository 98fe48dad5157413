//! Ordinary least squares fits.
//!
//! Two model families are supported:
//! - straight line `y = alpha + beta * x`
//! - geometric growth `y = a * r^x`, fitted as a line in log space
//!
//! Both return `None` when the fit is undefined (fewer than two points,
//! mismatched lengths, or all `x` identical). Sparse data is an expected
//! steady state, so absence is never an error.

use serde::{Deserialize, Serialize};

/// Result of a straight-line fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Intercept.
    pub alpha: f64,
    /// Slope.
    pub beta: f64,
    /// Coefficient of determination.
    pub r2: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.alpha + self.beta * x
    }
}

/// Result of a geometric (log-linear) fit, `y ≈ a * r^x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricFit {
    /// Scale: value of the model at `x = 0`.
    pub a: f64,
    /// Growth ratio per unit of `x`.
    pub r: f64,
    /// R² of the underlying log-space line.
    pub r2: f64,
}

impl GeometricFit {
    /// Evaluate the fitted curve at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.a * self.r.powf(x)
    }
}

/// Fit `y = alpha + beta * x` by closed-form OLS.
pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    // Equal decimal xs can leave a rounding-sized nonzero denominator.
    if xs.iter().all(|&x| x == xs[0]) {
        return None;
    }
    let n = xs.len() as f64;

    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return None;
    }

    let beta = (n * sum_xy - sum_x * sum_y) / denom;
    let alpha = (sum_y - beta * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (alpha + beta * x)).powi(2))
        .sum();

    // A constant series is fitted perfectly by a flat line.
    let r2 = if ss_tot == 0.0 || ys.iter().all(|&y| y == ys[0]) {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(LinearFit { alpha, beta, r2 })
}

/// Fit `cost ≈ a * r^level` via a linear fit on `(level, ln cost)`.
///
/// Costs must be strictly positive; this is not re-checked, so a
/// non-positive cost yields a non-finite fit rather than `None`.
pub fn fit_geometric(levels: &[f64], costs: &[f64]) -> Option<GeometricFit> {
    if levels.len() != costs.len() || levels.len() < 2 {
        return None;
    }
    let ln_costs: Vec<f64> = costs.iter().map(|c| c.ln()).collect();
    let line = fit_linear(levels, &ln_costs)?;
    Some(GeometricFit {
        a: line.alpha.exp(),
        r: line.beta.exp(),
        r2: line.r2,
    })
}
