//! Sentiment observations and daily aggregation.
//!
//! Collapses a stream of timestamped sentiment observations (label +
//! confidence, as produced by an external classifier) into one signal per
//! calendar day. Day bucketing truncates each timestamp to its own calendar
//! date with no timezone conversion; timestamps are treated as UTC by
//! convention.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use super::error::OracleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    /// Signed numeric value: positive = +1, negative = -1, neutral = 0.
    pub fn numeric(&self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentObservation {
    pub timestamp: NaiveDateTime,
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentObservation {
    pub fn new(
        timestamp: NaiveDateTime,
        label: SentimentLabel,
        confidence: f64,
    ) -> Result<Self, OracleError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(OracleError::InvalidConfidence { value: confidence });
        }
        Ok(SentimentObservation {
            timestamp,
            label,
            confidence,
        })
    }

    /// Confidence-weighted signed score in [-1, 1].
    pub fn weighted_score(&self) -> f64 {
        self.label.numeric() * self.confidence
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub daily_sentiment: f64,
    pub news_volume: u32,
}

/// Aggregate observations into one record per calendar day, sorted ascending.
///
/// daily_sentiment is the arithmetic mean of weighted scores within the day;
/// news_volume the observation count. Days with no observations are absent
/// from the output — the merge step fills zeros, keeping "no data" distinct
/// from "neutral data" until the join. Empty input yields empty output.
pub fn aggregate_daily(observations: &[SentimentObservation]) -> Vec<DailySentiment> {
    let mut by_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();

    for obs in observations {
        let entry = by_day.entry(obs.timestamp.date()).or_insert((0.0, 0));
        entry.0 += obs.weighted_score();
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (sum, count))| DailySentiment {
            date,
            daily_sentiment: sum / count as f64,
            news_volume: count,
        })
        .collect()
}
