//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All three use span EMAs seeded at the first observation, so the series is
//! defined from index 0 and converges over time rather than gating on a
//! warm-up count.

use super::ema::span_ema;

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let ema_fast = span_ema(closes, fast);
    let ema_slow = span_ema(closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = span_ema(&line, signal);
    let histogram: Vec<f64> = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| l - s)
        .collect();

    Macd {
        line,
        signal: signal_line,
        histogram,
    }
}
