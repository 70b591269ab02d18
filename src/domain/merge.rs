//! Dataset merge: indicator rows ⨝ daily sentiment → dense feature matrix.
//!
//! Calendar-day left join with the price series driving: every trading day
//! survives, sentiment-only days are dropped (prices define the trading
//! calendar). Days without sentiment get (0.0, 0). After the join, every row
//! still carrying an undefined indicator value (the deterministic warm-up
//! prefix) is dropped entirely; truncation, not imputation.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::error::OracleError;
use super::features::IndicatorRow;
use super::sentiment::DailySentiment;

/// One row of the final feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub indicators: IndicatorRow,
    pub daily_sentiment: f64,
    pub news_volume: u32,
}

/// Join indicator rows with daily sentiment on date.
///
/// Fails on duplicate or out-of-order dates in either input rather than
/// silently reordering: reordering here would corrupt the no-look-ahead
/// guarantee the indicator series were built under.
pub fn merge_features(
    rows: &[IndicatorRow],
    sentiment: &[DailySentiment],
) -> Result<Vec<FeatureRow>, OracleError> {
    for i in 1..rows.len() {
        if rows[i].date == rows[i - 1].date {
            return Err(OracleError::DuplicateDate { date: rows[i].date });
        }
        if rows[i].date < rows[i - 1].date {
            return Err(OracleError::UnsortedInput { position: i });
        }
    }

    let mut by_day: BTreeMap<NaiveDate, &DailySentiment> = BTreeMap::new();
    for s in sentiment {
        if by_day.insert(s.date, s).is_some() {
            return Err(OracleError::DuplicateDate { date: s.date });
        }
    }

    let merged = rows
        .iter()
        .filter(|row| row.is_complete())
        .map(|row| match by_day.get(&row.date) {
            Some(s) => FeatureRow {
                indicators: row.clone(),
                daily_sentiment: s.daily_sentiment,
                news_volume: s.news_volume,
            },
            None => FeatureRow {
                indicators: row.clone(),
                daily_sentiment: 0.0,
                news_volume: 0,
            },
        })
        .collect();

    Ok(merged)
}
