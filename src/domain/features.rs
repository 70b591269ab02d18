//! Indicator-augmented price rows (the feature-engineering façade).
//!
//! [`compute_indicator_rows`] injects every technical feature into a price
//! series in one pass: log-returns, RSI, MACD, Bollinger Bands, and rolling
//! volatility, all causal and index-aligned with the input. Warm-up values
//! are NaN; no rows are dropped here — that is the merge step's decision.

use super::indicator::{
    calculate_bollinger, calculate_log_returns, calculate_macd, calculate_rsi,
    calculate_volatility, IndicatorConfig,
};
use super::ohlcv::PriceBar;
use chrono::NaiveDate;

/// Which price column feeds the indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    #[default]
    Close,
}

impl PriceColumn {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "open" => Some(PriceColumn::Open),
            "high" => Some(PriceColumn::High),
            "low" => Some(PriceColumn::Low),
            "close" => Some(PriceColumn::Close),
            _ => None,
        }
    }

    pub fn extract(&self, bar: &PriceBar) -> f64 {
        match self {
            PriceColumn::Open => bar.open,
            PriceColumn::High => bar.high,
            PriceColumn::Low => bar.low,
            PriceColumn::Close => bar.close,
        }
    }
}

/// A price bar extended with its derived technical features.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub log_return: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub bb_width: f64,
    pub volatility: f64,
}

impl IndicatorRow {
    /// True when every derived field is defined (past all warm-up windows).
    pub fn is_complete(&self) -> bool {
        !(self.log_return.is_nan()
            || self.rsi.is_nan()
            || self.macd_line.is_nan()
            || self.macd_signal.is_nan()
            || self.macd_hist.is_nan()
            || self.bb_upper.is_nan()
            || self.bb_lower.is_nan()
            || self.bb_width.is_nan()
            || self.volatility.is_nan())
    }
}

/// Compute all technical features over a price series.
///
/// Pure function of the input: identical input yields bit-identical output.
pub fn compute_indicator_rows(
    bars: &[PriceBar],
    column: PriceColumn,
    cfg: &IndicatorConfig,
) -> Vec<IndicatorRow> {
    let prices: Vec<f64> = bars.iter().map(|b| column.extract(b)).collect();

    let log_returns = calculate_log_returns(&prices);
    let rsi = calculate_rsi(&prices, cfg.rsi_period);
    let macd = calculate_macd(&prices, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
    let bb = calculate_bollinger(&prices, cfg.bb_period, cfg.bb_k);
    let volatility = calculate_volatility(&prices, cfg.vol_window);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            log_return: log_returns[i],
            rsi: rsi[i],
            macd_line: macd.line[i],
            macd_signal: macd.signal[i],
            macd_hist: macd.histogram[i],
            bb_upper: bb.upper[i],
            bb_lower: bb.lower[i],
            bb_width: bb.width[i],
            volatility: volatility[i],
        })
        .collect()
}
