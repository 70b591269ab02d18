//! RSI (Relative Strength Index).
//!
//! Wilder's smoothing as an EWMA with alpha = 1/period over the gain and
//! loss series. The price change at t=0 is undefined and treated as zero, so
//! both EWMAs seed at 0 and the recursion is
//! avg[t] = avg[t-1] + alpha * (x[t] - avg[t-1]). Outputs before `period`
//! observations have accumulated are NaN; the first valid RSI sits at index
//! period - 1.
//!
//! RSI = 100 * avg_gain / (avg_gain + avg_loss). When both averages are zero
//! (a perfectly flat window) RSI is defined as 100. That is documented
//! policy; downstream consumers encode this exact value.

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        avg_gain += alpha * (change.max(0.0) - avg_gain);
        avg_loss += alpha * ((-change).max(0.0) - avg_loss);

        if i + 1 >= period {
            out[i] = rsi_value(avg_gain, avg_loss);
        }
    }

    // period = 1: no warm-up beyond the seed itself
    if period == 1 {
        out[0] = 100.0;
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let denom = avg_gain + avg_loss;
    if denom == 0.0 {
        100.0
    } else {
        100.0 * avg_gain / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn first_valid_output_at_period_minus_one() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64).collect();
        let rsi = calculate_rsi(&closes, 14);

        for (i, v) in rsi.iter().enumerate().take(13) {
            assert!(v.is_nan(), "index {} should be NaN", i);
        }
        assert!(rsi[13].is_finite());
    }

    #[test]
    fn strictly_increasing_series_pins_at_100() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&closes, 14);

        for v in &rsi[13..] {
            assert_relative_eq!(*v, 100.0);
        }
    }

    #[test]
    fn strictly_decreasing_series_pins_at_0() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&closes, 14);

        for v in &rsi[13..] {
            assert_relative_eq!(*v, 0.0);
        }
    }

    #[test]
    fn flat_series_defined_as_100() {
        let closes = vec![100.0; 20];
        let rsi = calculate_rsi(&closes, 14);
        assert_relative_eq!(rsi[13], 100.0);
        assert_relative_eq!(rsi[19], 100.0);
    }

    #[test]
    fn too_short_series_is_all_nan() {
        let closes: Vec<f64> = (0..13).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 13);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn zero_period_is_all_nan() {
        let rsi = calculate_rsi(&[100.0, 101.0, 102.0], 0);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ewma_recursion_matches_manual() {
        // zero-seeded EWMA, alpha = 1/2, change at t=0 treated as zero
        let closes = vec![10.0, 11.0, 10.5, 11.5];
        let rsi = calculate_rsi(&closes, 2);

        let alpha = 0.5;
        // t=1: gain 1.0, loss 0.0
        let mut ag = 0.0 + alpha * (1.0 - 0.0);
        let mut al = 0.0 + alpha * (0.0 - 0.0);
        assert_relative_eq!(rsi[1], 100.0 * ag / (ag + al));

        // t=2: gain 0.0, loss 0.5
        ag += alpha * (0.0 - ag);
        al += alpha * (0.5 - al);
        assert_relative_eq!(rsi[2], 100.0 * ag / (ag + al));

        // t=3: gain 1.0, loss 0.0
        ag += alpha * (1.0 - ag);
        al += alpha * (0.0 - al);
        assert_relative_eq!(rsi[3], 100.0 * ag / (ag + al));
    }

    #[test]
    fn seed_carries_zero_change_weight() {
        // Index 13 for period 14 averages over 13 real changes plus the
        // zero-filled t=0 change, so a uniform +1 drift still reads 100
        // while a single early loss keeps pulling values below it.
        let mut closes: Vec<f64> = (0..21).map(|i| 100.0 + i as f64).collect();
        closes[2] = 99.0; // one down move early in the seed window
        let rsi = calculate_rsi(&closes, 14);

        assert!(rsi[13].is_finite());
        assert!(rsi[13] < 100.0);
        // the loss decays geometrically but never fully leaves the EWMA
        assert!(rsi[20] < 100.0);
        assert!(rsi[20] > rsi[13]);
    }

    proptest! {
        #[test]
        fn rsi_bounded_0_100(closes in prop::collection::vec(1.0f64..1000.0, 15..60)) {
            let rsi = calculate_rsi(&closes, 14);
            for v in rsi {
                if v.is_finite() {
                    prop_assert!((0.0..=100.0).contains(&v));
                }
            }
        }
    }
}
