//! CSV report writer for feature matrices and backtest artifacts.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::OracleError;
use crate::domain::merge::FeatureRow;
use crate::domain::order::Side;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> OracleError {
    OracleError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_features(&self, rows: &[FeatureRow], path: &Path) -> Result<(), OracleError> {
        let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record([
            "date",
            "open",
            "high",
            "low",
            "close",
            "volume",
            "log_return",
            "rsi",
            "macd_line",
            "macd_signal",
            "macd_hist",
            "bb_upper",
            "bb_lower",
            "bb_width",
            "volatility",
            "daily_sentiment",
            "news_volume",
        ])
        .map_err(csv_error)?;

        for row in rows {
            let ind = &row.indicators;
            wtr.write_record([
                ind.date.format("%Y-%m-%d").to_string(),
                ind.open.to_string(),
                ind.high.to_string(),
                ind.low.to_string(),
                ind.close.to_string(),
                ind.volume.to_string(),
                ind.log_return.to_string(),
                ind.rsi.to_string(),
                ind.macd_line.to_string(),
                ind.macd_signal.to_string(),
                ind.macd_hist.to_string(),
                ind.bb_upper.to_string(),
                ind.bb_lower.to_string(),
                ind.bb_width.to_string(),
                ind.volatility.to_string(),
                row.daily_sentiment.to_string(),
                row.news_volume.to_string(),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_fills(&self, result: &BacktestResult, path: &Path) -> Result<(), OracleError> {
        let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record(["date", "side", "quantity", "price", "commission"])
            .map_err(csv_error)?;

        for fill in &result.fills {
            let side = match fill.side {
                Side::Buy => "buy",
                Side::Sell => "sell",
            };
            wtr.write_record([
                fill.date.format("%Y-%m-%d").to_string(),
                side.to_string(),
                fill.quantity.to_string(),
                fill.price.to_string(),
                fill.commission.to_string(),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_equity_curve(&self, result: &BacktestResult, path: &Path) -> Result<(), OracleError> {
        let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record(["date", "equity"]).map_err(csv_error)?;

        for point in &result.portfolio.equity_curve {
            wtr.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                point.equity.to_string(),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
