//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::OracleError;
use crate::domain::merge::FeatureRow;
use std::path::Path;

/// Port for writing pipeline outputs for inspection. Serialization format is
/// not load-bearing for correctness; the in-memory structures are canonical.
pub trait ReportPort {
    fn write_features(&self, rows: &[FeatureRow], path: &Path) -> Result<(), OracleError>;
    fn write_fills(&self, result: &BacktestResult, path: &Path) -> Result<(), OracleError>;
    fn write_equity_curve(&self, result: &BacktestResult, path: &Path) -> Result<(), OracleError>;
}
