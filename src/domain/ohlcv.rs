//! Daily OHLCV bar representation and structural validation.

use chrono::NaiveDate;

use super::error::OracleError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Check that a price series is in strictly ascending date order.
///
/// Violations fail fast rather than being sorted away: silently reordering
/// would corrupt the no-look-ahead guarantee downstream.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), OracleError> {
    for i in 1..bars.len() {
        if bars[i].date == bars[i - 1].date {
            return Err(OracleError::DuplicateDate { date: bars[i].date });
        }
        if bars[i].date < bars[i - 1].date {
            return Err(OracleError::UnsortedInput { position: i });
        }
    }
    Ok(())
}
