//! Log-returns and rolling historical volatility.

use super::rolling_std;

/// log_return[t] = ln(close[t]) - ln(close[t-1]); NaN at t=0.
///
/// Preferred over simple percentage change for its symmetry and temporal
/// additivity.
pub fn calculate_log_returns(closes: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    for i in 1..closes.len() {
        out[i] = closes[i].ln() - closes[i - 1].ln();
    }
    out
}

/// Rolling sample standard deviation of log-returns over a trailing window.
/// A 21-day window is roughly one month of trading. Because log_return[0] is
/// NaN, the first `window` positions are NaN.
pub fn calculate_volatility(closes: &[f64], window: usize) -> Vec<f64> {
    rolling_std(&calculate_log_returns(closes), window)
}
