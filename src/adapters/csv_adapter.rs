//! CSV file data adapter for price and sentiment tables.
//!
//! Layout under the base directory: `{instrument}_prices.csv` with header
//! `date,open,high,low,close,volume`, and `{instrument}_sentiment.csv` with
//! header `timestamp,label,confidence`. Rows are returned in file order;
//! structural validation (ascending unique dates) is the domain's job and
//! happens there, never by silent re-sorting here.

use crate::domain::error::OracleError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::sentiment::{SentimentLabel, SentimentObservation};
use crate::ports::data_port::{PriceDataPort, SentimentDataPort};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn price_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{}_prices.csv", instrument))
    }

    fn sentiment_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{}_sentiment.csv", instrument))
    }
}

/// Map header names to column indices, case-insensitively.
fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect()
}

fn require_column(index: &HashMap<String, usize>, column: &str) -> Result<usize, OracleError> {
    index.get(column).copied().ok_or_else(|| OracleError::MissingColumn {
        column: column.to_string(),
    })
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize, column: &str) -> Result<&'a str, OracleError> {
    record.get(idx).ok_or_else(|| OracleError::Data {
        reason: format!("row missing value for column '{}'", column),
    })
}

impl PriceDataPort for CsvAdapter {
    fn fetch_prices(&self, instrument: &str) -> Result<Vec<PriceBar>, OracleError> {
        let path = self.price_path(instrument);
        let content = fs::read_to_string(&path).map_err(|e| OracleError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let index = header_index(rdr.headers().map_err(|e| OracleError::Data {
            reason: format!("CSV header error: {}", e),
        })?);

        let date_idx = require_column(&index, "date")?;
        let open_idx = require_column(&index, "open")?;
        let high_idx = require_column(&index, "high")?;
        let low_idx = require_column(&index, "low")?;
        let close_idx = require_column(&index, "close")?;
        let volume_idx = require_column(&index, "volume")?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| OracleError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = NaiveDate::parse_from_str(field(&record, date_idx, "date")?, "%Y-%m-%d")
                .map_err(|e| OracleError::Data {
                    reason: format!("invalid date: {}", e),
                })?;

            let parse_f64 = |idx: usize, column: &str| -> Result<f64, OracleError> {
                field(&record, idx, column)?
                    .parse()
                    .map_err(|e| OracleError::Data {
                        reason: format!("invalid {} value: {}", column, e),
                    })
            };

            let volume: i64 =
                field(&record, volume_idx, "volume")?
                    .parse()
                    .map_err(|e| OracleError::Data {
                        reason: format!("invalid volume value: {}", e),
                    })?;

            bars.push(PriceBar {
                date,
                open: parse_f64(open_idx, "open")?,
                high: parse_f64(high_idx, "high")?,
                low: parse_f64(low_idx, "low")?,
                close: parse_f64(close_idx, "close")?,
                volume,
            });
        }

        Ok(bars)
    }
}

impl SentimentDataPort for CsvAdapter {
    fn fetch_observations(
        &self,
        instrument: &str,
    ) -> Result<Vec<SentimentObservation>, OracleError> {
        let path = self.sentiment_path(instrument);

        // No sentiment file at all means no data for this instrument.
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| OracleError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let index = header_index(rdr.headers().map_err(|e| OracleError::Data {
            reason: format!("CSV header error: {}", e),
        })?);

        // A table without the label column carries no usable signal; treat it
        // as empty rather than failing the whole instrument.
        let Some(&label_idx) = index.get("label") else {
            return Ok(Vec::new());
        };
        let timestamp_idx = require_column(&index, "timestamp")?;
        let confidence_idx = require_column(&index, "confidence")?;

        let mut observations = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| OracleError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp = NaiveDateTime::parse_from_str(
                field(&record, timestamp_idx, "timestamp")?,
                "%Y-%m-%dT%H:%M:%S",
            )
            .map_err(|e| OracleError::Data {
                reason: format!("invalid timestamp: {}", e),
            })?;

            let label_str = field(&record, label_idx, "label")?;
            let label = SentimentLabel::parse(label_str).ok_or_else(|| OracleError::Data {
                reason: format!("unknown sentiment label '{}'", label_str),
            })?;

            let confidence: f64 = field(&record, confidence_idx, "confidence")?
                .parse()
                .map_err(|e| OracleError::Data {
                    reason: format!("invalid confidence value: {}", e),
                })?;

            observations.push(SentimentObservation::new(timestamp, label, confidence)?);
        }

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(price_csv: &str, sentiment_csv: Option<&str>) -> (TempDir, CsvAdapter) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("TSLA_prices.csv"), price_csv).unwrap();
        if let Some(s) = sentiment_csv {
            fs::write(dir.path().join("TSLA_sentiment.csv"), s).unwrap();
        }
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        (dir, adapter)
    }

    const PRICES: &str = "date,open,high,low,close,volume\n\
        2024-01-02,100.0,110.0,95.0,105.0,50000\n\
        2024-01-03,105.0,115.0,100.0,110.0,60000\n";

    #[test]
    fn fetch_prices_parses_rows() {
        let (_dir, adapter) = setup(PRICES, None);
        let bars = adapter.fetch_prices("TSLA").unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[1].volume, 60000);
    }

    #[test]
    fn fetch_prices_missing_column() {
        let (_dir, adapter) = setup("date,open,high,low,volume\n2024-01-02,1,2,0.5,10\n", None);
        match adapter.fetch_prices("TSLA") {
            Err(OracleError::MissingColumn { column }) => assert_eq!(column, "close"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn fetch_prices_missing_file() {
        let (_dir, adapter) = setup(PRICES, None);
        assert!(matches!(
            adapter.fetch_prices("NVDA"),
            Err(OracleError::Data { .. })
        ));
    }

    #[test]
    fn fetch_prices_header_order_independent() {
        let csv = "volume,close,low,high,open,date\n50000,105.0,95.0,110.0,100.0,2024-01-02\n";
        let (_dir, adapter) = setup(csv, None);
        let bars = adapter.fetch_prices("TSLA").unwrap();
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn fetch_observations_parses_rows() {
        let sentiment = "timestamp,label,confidence\n\
            2024-01-02T09:30:00,positive,0.9\n\
            2024-01-02T15:45:00,neutral,0.8\n";
        let (_dir, adapter) = setup(PRICES, Some(sentiment));

        let obs = adapter.fetch_observations("TSLA").unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].label, SentimentLabel::Positive);
        assert_eq!(obs[0].confidence, 0.9);
        assert_eq!(obs[1].label, SentimentLabel::Neutral);
    }

    #[test]
    fn missing_sentiment_file_is_empty_not_error() {
        let (_dir, adapter) = setup(PRICES, None);
        assert!(adapter.fetch_observations("TSLA").unwrap().is_empty());
    }

    #[test]
    fn sentiment_without_label_column_is_empty() {
        let sentiment = "timestamp,confidence\n2024-01-02T09:30:00,0.9\n";
        let (_dir, adapter) = setup(PRICES, Some(sentiment));
        assert!(adapter.fetch_observations("TSLA").unwrap().is_empty());
    }

    #[test]
    fn sentiment_bad_confidence_propagates() {
        let sentiment = "timestamp,label,confidence\n2024-01-02T09:30:00,positive,1.4\n";
        let (_dir, adapter) = setup(PRICES, Some(sentiment));
        assert!(matches!(
            adapter.fetch_observations("TSLA"),
            Err(OracleError::InvalidConfidence { .. })
        ));
    }

    #[test]
    fn sentiment_unknown_label_is_data_error() {
        let sentiment = "timestamp,label,confidence\n2024-01-02T09:30:00,bullish,0.9\n";
        let (_dir, adapter) = setup(PRICES, Some(sentiment));
        assert!(matches!(
            adapter.fetch_observations("TSLA"),
            Err(OracleError::Data { .. })
        ));
    }
}
