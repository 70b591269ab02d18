//! Strategy policies: pluggable bar-by-bar decision functions.
//!
//! A policy sees only history up to and including the current bar and emits
//! BUY/SELL/HOLD, optionally with a confidence the engine gates on. The
//! engine is fully testable with the rule-based [`MomentumPolicy`] alone;
//! [`ModelPolicy`] wraps an injected prediction function so model integration
//! stays decoupled from engine correctness.

use super::ohlcv::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: Signal,
    pub confidence: Option<f64>,
}

impl Decision {
    pub fn hold() -> Self {
        Decision {
            signal: Signal::Hold,
            confidence: None,
        }
    }
}

pub trait StrategyPolicy {
    fn decide(&mut self, history: &[PriceBar]) -> Decision;
}

/// Rule-based momentum policy: BUY when today's close is above yesterday's,
/// SELL when below. No confidence, no model dependency.
#[derive(Debug, Default)]
pub struct MomentumPolicy;

impl StrategyPolicy for MomentumPolicy {
    fn decide(&mut self, history: &[PriceBar]) -> Decision {
        if history.len() < 2 {
            return Decision::hold();
        }
        let today = history[history.len() - 1].close;
        let yesterday = history[history.len() - 2].close;

        let signal = if today > yesterday {
            Signal::Buy
        } else if today < yesterday {
            Signal::Sell
        } else {
            Signal::Hold
        };

        Decision {
            signal,
            confidence: None,
        }
    }
}

/// Model-backed policy: delegates to an injected function returning the
/// probability that the price rises tomorrow. Probability >= 0.5 maps to BUY,
/// below to SELL; confidence is the probability of the emitted direction.
/// Threshold gating is the engine's job, not the policy's.
pub struct ModelPolicy<F>
where
    F: FnMut(&[PriceBar]) -> f64,
{
    predict: F,
}

impl<F> ModelPolicy<F>
where
    F: FnMut(&[PriceBar]) -> f64,
{
    pub fn new(predict: F) -> Self {
        ModelPolicy { predict }
    }
}

impl<F> StrategyPolicy for ModelPolicy<F>
where
    F: FnMut(&[PriceBar]) -> f64,
{
    fn decide(&mut self, history: &[PriceBar]) -> Decision {
        if history.is_empty() {
            return Decision::hold();
        }
        let p = (self.predict)(history);

        if p >= 0.5 {
            Decision {
                signal: Signal::Buy,
                confidence: Some(p),
            }
        } else {
            Decision {
                signal: Signal::Sell,
                confidence: Some(1.0 - p),
            }
        }
    }
}
