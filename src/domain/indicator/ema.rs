//! Span-based exponential moving average.
//!
//! k = 2/(span+1), seeded with the first observation, then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k). There is no minimum-period gate: the
//! series is defined from the first observation and converges over time.

pub fn span_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = f64::NAN;

    for &v in values {
        ema = if ema.is_nan() {
            v
        } else {
            v * k + ema * (1.0 - k)
        };
        out.push(ema);
    }

    out
}
