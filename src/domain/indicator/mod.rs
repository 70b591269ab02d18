//! Technical indicator implementations.
//!
//! Every function here is a pure, causal transform: output index `t` depends
//! only on input indices `0..=t`, and each output series is index-aligned 1:1
//! with its input. Warm-up positions carry `f64::NAN` instead of raising;
//! dropping incomplete rows is the merge step's job, not the indicators'.

pub mod ema;
pub mod rsi;
pub mod macd;
pub mod bollinger;
pub mod returns;

pub use bollinger::{calculate_bollinger, Bollinger};
pub use ema::span_ema;
pub use macd::{calculate_macd, Macd};
pub use returns::{calculate_log_returns, calculate_volatility};
pub use rsi::calculate_rsi;

/// Indicator periods. Defaults match the standard parameterisation used by
/// the feature pipeline: RSI(14), MACD(12,26,9), Bollinger(20, 2.0), 21-day
/// volatility.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_k: f64,
    pub vol_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_k: 2.0,
            vol_window: 21,
        }
    }
}

/// Rolling mean over a trailing window. NaN until the window fills; a NaN
/// anywhere in the window propagates to the output.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        w.iter().sum::<f64>() / w.len() as f64
    })
}

/// Rolling sample standard deviation (N-1 divisor) over a trailing window.
/// NaN until the window fills or while the window contains a NaN.
pub(crate) fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let var = w.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    })
}

fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        let w = &values[i + 1 - window..=i];
        if w.iter().all(|v| v.is_finite()) {
            out[i] = f(w);
        }
    }
    out
}
