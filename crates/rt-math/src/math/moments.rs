//! Sample moments and z-scores.
//!
//! Variance uses Bessel's correction (divide by `n - 1`). Every function
//! reports "undefined" as `None` rather than NaN so callers can propagate
//! absence explicitly.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance. `None` with fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation. `None` with fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Z-score of `value` against the mean and sample standard deviation of
/// `window`.
///
/// `None` when the window has fewer than two points or zero spread.
pub fn z_score(window: &[f64], value: f64) -> Option<f64> {
    // Rounding leaves a tiny nonzero sd on constant decimal windows.
    if window.iter().all(|&v| v == window[0]) {
        return None;
    }
    let m = mean(window)?;
    let sd = sample_std_dev(window)?;
    if sd == 0.0 {
        return None;
    }
    Some((value - m) / sd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn variance_uses_bessel_correction() {
        // Population variance of [1,2,3,4] is 1.25; sample variance is 5/3.
        let v = sample_variance(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(approx_eq(v, 5.0 / 3.0, 1e-12));
    }

    #[test]
    fn single_point_has_no_spread() {
        assert_eq!(sample_variance(&[7.0]), None);
        assert_eq!(z_score(&[7.0], 7.0), None);
    }

    #[test]
    fn identical_window_is_absent_not_zero() {
        let z = z_score(&[5.0, 5.0, 5.0, 5.0], 5.0);
        assert_eq!(z, None);
    }

    #[test]
    fn decimal_constant_window_is_absent() {
        assert_eq!(z_score(&[0.1; 6], 0.1), None);
        assert_eq!(z_score(&[12.7; 3], 99.0), None);
        assert!(z_score(&[0.1, 0.1, 0.2], 0.1).is_some());
    }

    #[test]
    fn z_score_signed() {
        let window = [10.0, 10.0, 10.0, 40.0];
        let hi = z_score(&window, 40.0).unwrap();
        let lo = z_score(&window, 10.0).unwrap();
        assert!(hi > 0.0);
        assert!(lo < 0.0);
        // mean 17.5, sd 15 -> (40 - 17.5) / 15 = 1.5
        assert!(approx_eq(hi, 1.5, 1e-12));
    }
}
