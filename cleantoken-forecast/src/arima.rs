//! Conditional-sum-of-squares estimation for the ARIMA(1,1,1)
//! forecaster: difference once, fit ARMA(1,1) on the differences by a
//! deterministic coarse-to-fine grid search, forecast one step ahead.

/// Stationarity/invertibility clamp for both coefficients.
const GRID_EXTENT: f64 = 0.95;
const COARSE_STEP: f64 = 0.1;
/// Each pass shrinks the search window to the previous step size and
/// divides the step by ten, so fitting cost is fixed up front.
const REFINEMENT_PASSES: usize = 3;

/// One-step-ahead ARIMA(1,1,1) point forecast.
///
/// Returns `None` when the series cannot support a fit: too short, a
/// degenerate (flat) differenced series, or non-finite arithmetic
/// anywhere along the way. Callers treat `None` as the documented
/// downgrade to the mean fallback.
pub(crate) fn one_step_forecast(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let first = diffs[0];
    let flat = diffs
        .iter()
        .all(|d| (d - first).abs() <= f64::EPSILON * first.abs().max(1.0));
    if flat {
        return None;
    }

    let mu = diffs.iter().sum::<f64>() / diffs.len() as f64;
    if !mu.is_finite() {
        return None;
    }

    let (phi, theta) = fit_arma11(&diffs, mu)?;
    let (_, last_err) = css(&diffs, mu, phi, theta);

    let last_diff = *diffs.last()?;
    let next_diff = mu + phi * (last_diff - mu) + theta * last_err;
    let forecast = values.last()? + next_diff;
    forecast.is_finite().then_some(forecast)
}

/// Minimizes the conditional sum of squared residuals over
/// (phi, theta) with the mean term fixed at the sample mean of the
/// differences.
fn fit_arma11(diffs: &[f64], mu: f64) -> Option<(f64, f64)> {
    let mut best = (0.0, 0.0);
    let mut best_loss = f64::INFINITY;

    let mut center = (0.0, 0.0);
    let mut extent = GRID_EXTENT;
    let mut step = COARSE_STEP;

    for _ in 0..REFINEMENT_PASSES {
        for phi in grid(center.0, extent, step) {
            for theta in grid(center.1, extent, step) {
                let (loss, _) = css(diffs, mu, phi, theta);
                if loss < best_loss {
                    best_loss = loss;
                    best = (phi, theta);
                }
            }
        }
        center = best;
        extent = step;
        step /= 10.0;
    }

    best_loss.is_finite().then_some(best)
}

fn grid(center: f64, extent: f64, step: f64) -> impl Iterator<Item = f64> {
    let steps = (2.0 * extent / step).round() as i64;
    (0..=steps).map(move |i| {
        (center - extent + i as f64 * step).clamp(-GRID_EXTENT, GRID_EXTENT)
    })
}

/// Conditional sum of squares with pre-sample terms set to zero.
/// Returns the loss together with the final residual, which seeds the
/// moving-average term of the one-step forecast.
fn css(diffs: &[f64], mu: f64, phi: f64, theta: f64) -> (f64, f64) {
    let mut prev_centered = 0.0;
    let mut prev_err = 0.0;
    let mut loss = 0.0;
    for &d in diffs {
        let centered = d - mu;
        let err = centered - phi * prev_centered - theta * prev_err;
        loss += err * err;
        prev_centered = centered;
        prev_err = err;
    }
    (loss, prev_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_differences_refuse_to_fit() {
        // Linear ramp: every difference is identical.
        assert_eq!(one_step_forecast(&[10.0, 20.0, 30.0, 40.0, 50.0]), None);
    }

    #[test]
    fn varied_series_produces_a_finite_forecast() {
        let values = [80.0, 85.0, 78.0, 90.0, 84.0, 88.0, 92.0];
        let forecast = one_step_forecast(&values).unwrap();
        assert!(forecast.is_finite());
    }

    #[test]
    fn css_residuals_are_zero_for_a_perfect_ar_fit() {
        // d[t] = 0.5 * d[t-1] exactly, centered at zero.
        let diffs = [8.0, 4.0, 2.0, 1.0, 0.5];
        let (loss, _) = css(&diffs, 0.0, 0.5, 0.0);
        // First residual is the unpredicted initial value.
        assert!((loss - 64.0).abs() < 1e-9);
    }
}
