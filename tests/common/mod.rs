#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use market_oracle::domain::ohlcv::PriceBar;
use market_oracle::domain::sentiment::{SentimentLabel, SentimentObservation};
use std::fs;
use std::path::Path;

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// A gently oscillating daily series starting 2024-01-01, long enough to
/// clear every indicator warm-up window.
pub fn make_series(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.05;
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.5,
                close,
                volume: 2000 + (i as i64) * 10,
            }
        })
        .collect()
}

pub fn make_observation(ts: &str, label: SentimentLabel, confidence: f64) -> SentimentObservation {
    SentimentObservation::new(
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S").unwrap(),
        label,
        confidence,
    )
    .unwrap()
}

/// Write a price CSV for `instrument` under `dir` in the layout the CSV
/// adapter expects.
pub fn write_price_csv(dir: &Path, instrument: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    fs::write(dir.join(format!("{}_prices.csv", instrument)), content).unwrap();
}

pub fn write_sentiment_csv(dir: &Path, instrument: &str, rows: &[(&str, &str, f64)]) {
    let mut content = String::from("timestamp,label,confidence\n");
    for (ts, label, confidence) in rows {
        content.push_str(&format!("{},{},{}\n", ts, label, confidence));
    }
    fs::write(dir.join(format!("{}_sentiment.csv", instrument)), content).unwrap();
}
