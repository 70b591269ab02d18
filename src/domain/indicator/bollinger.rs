//! Bollinger Bands.
//!
//! Middle = SMA(period); Std = sample standard deviation over the same
//! trailing window; Upper/Lower = Middle ± k*Std;
//! Width = (Upper - Lower) / Middle.
//!
//! All four series are NaN until `period` observations accumulate.

use super::{rolling_mean, rolling_std};

#[derive(Debug, Clone, PartialEq)]
pub struct Bollinger {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, k: f64) -> Bollinger {
    let middle = rolling_mean(closes, period);
    let std = rolling_std(closes, period);

    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());
    let mut width = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let u = middle[i] + k * std[i];
        let l = middle[i] - k * std[i];
        upper.push(u);
        lower.push(l);
        width.push((u - l) / middle[i]);
    }

    Bollinger {
        upper,
        middle,
        lower,
        width,
    }
}
