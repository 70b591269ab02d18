//! End-to-end pipeline tests: CSV input through feature engineering, daily
//! sentiment aggregation, the merge, and the backtest engine.

mod common;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use common::*;
use market_oracle::adapters::csv_adapter::CsvAdapter;
use market_oracle::adapters::csv_report_adapter::CsvReportAdapter;
use market_oracle::domain::backtest::{run_backtest, BacktestConfig, FillPolicy};
use market_oracle::domain::features::{compute_indicator_rows, PriceColumn};
use market_oracle::domain::indicator::IndicatorConfig;
use market_oracle::domain::merge::merge_features;
use market_oracle::domain::metrics::Metrics;
use market_oracle::domain::ohlcv::validate_series;
use market_oracle::domain::sentiment::aggregate_daily;
use market_oracle::domain::strategy::MomentumPolicy;
use market_oracle::ports::data_port::{PriceDataPort, SentimentDataPort};
use market_oracle::ports::report_port::ReportPort;
use tempfile::TempDir;

mod feature_pipeline {
    use super::*;

    #[test]
    fn csv_to_feature_matrix() {
        let dir = TempDir::new().unwrap();
        let bars = make_series(60);
        write_price_csv(dir.path(), "TSLA", &bars);
        write_sentiment_csv(
            dir.path(),
            "TSLA",
            &[
                ("2024-02-10T09:30:00", "positive", 0.9),
                ("2024-02-10T15:45:00", "neutral", 0.8),
                ("2024-02-11T12:00:00", "negative", 0.6),
            ],
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let fetched = adapter.fetch_prices("TSLA").unwrap();
        assert_eq!(fetched.len(), 60);
        validate_series(&fetched).unwrap();

        let observations = adapter.fetch_observations("TSLA").unwrap();
        let sentiment = aggregate_daily(&observations);
        assert_eq!(sentiment.len(), 2);

        // mean of (+1 * 0.9) and (0 * 0.8)
        let feb10 = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(sentiment[0].date, feb10);
        assert_relative_eq!(sentiment[0].daily_sentiment, 0.45);
        assert_eq!(sentiment[0].news_volume, 2);
        assert_relative_eq!(sentiment[1].daily_sentiment, -0.6);

        let rows = compute_indicator_rows(&fetched, PriceColumn::Close, &IndicatorConfig::default());
        let merged = merge_features(&rows, &sentiment).unwrap();

        // default warm-up drops the first 21 rows
        assert_eq!(merged.len(), 60 - 21);
        assert!(merged.iter().all(|f| f.indicators.is_complete()));

        let hit = merged
            .iter()
            .find(|f| f.indicators.date == feb10)
            .unwrap();
        assert_relative_eq!(hit.daily_sentiment, 0.45);
        assert_eq!(hit.news_volume, 2);

        // days without news carry the zero fill, not NaN
        let miss = merged
            .iter()
            .find(|f| f.indicators.date != feb10 && f.daily_sentiment == 0.0)
            .unwrap();
        assert_eq!(miss.news_volume, 0);
    }

    #[test]
    fn feature_csv_round_trips_row_count() {
        let dir = TempDir::new().unwrap();
        let bars = make_series(50);
        write_price_csv(dir.path(), "NVDA", &bars);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let fetched = adapter.fetch_prices("NVDA").unwrap();
        let rows =
            compute_indicator_rows(&fetched, PriceColumn::Close, &IndicatorConfig::default());
        let merged = merge_features(&rows, &[]).unwrap();

        let out = dir.path().join("NVDA_features.csv");
        CsvReportAdapter::new().write_features(&merged, &out).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().count(), merged.len() + 1);
    }

    #[test]
    fn instrument_without_sentiment_gets_zero_columns() {
        let dir = TempDir::new().unwrap();
        let bars = make_series(40);
        write_price_csv(dir.path(), "AMD", &bars);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let fetched = adapter.fetch_prices("AMD").unwrap();
        let sentiment = aggregate_daily(&adapter.fetch_observations("AMD").unwrap());
        assert!(sentiment.is_empty());

        let rows =
            compute_indicator_rows(&fetched, PriceColumn::Close, &IndicatorConfig::default());
        let merged = merge_features(&rows, &sentiment).unwrap();
        assert!(!merged.is_empty());
        assert!(merged.iter().all(|f| f.news_volume == 0));
    }
}

mod backtest_pipeline {
    use super::*;

    #[test]
    fn momentum_round_trip_over_hump() {
        // rises into day 3, falls after: one buy, one sell
        let bars: Vec<_> = [100.0, 101.0, 102.0, 101.0, 100.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut b = make_bar("2024-01-01", c);
                b.date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64);
                b.open = c;
                b
            })
            .collect();

        let config = BacktestConfig {
            fill_policy: FillPolicy::AtClose,
            ..BacktestConfig::default()
        };
        let result = run_backtest(&bars, &mut MomentumPolicy, &config).unwrap();

        assert_eq!(result.fills.len(), 2);
        assert_relative_eq!(result.fills[0].price, 101.0);
        assert_relative_eq!(result.fills[1].price, 101.0);
        assert!(!result.portfolio.is_long());

        let m = Metrics::compute(&result);
        assert_eq!(m.round_trips, 1);
        assert_relative_eq!(
            m.final_equity,
            10_000.0 - m.total_commission,
            epsilon = 1e-9
        );
    }

    #[test]
    fn csv_to_backtest_artifacts() {
        let dir = TempDir::new().unwrap();
        let bars = make_series(60);
        write_price_csv(dir.path(), "TSLA", &bars);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let fetched = adapter.fetch_prices("TSLA").unwrap();

        let config = BacktestConfig::default();
        let result = run_backtest(&fetched, &mut MomentumPolicy, &config).unwrap();

        assert_eq!(result.portfolio.equity_curve.len(), fetched.len());

        let report = CsvReportAdapter::new();
        let fills_path = dir.path().join("TSLA_fills.csv");
        let equity_path = dir.path().join("TSLA_equity.csv");
        report.write_fills(&result, &fills_path).unwrap();
        report.write_equity_curve(&result, &equity_path).unwrap();

        let equity = std::fs::read_to_string(&equity_path).unwrap();
        assert_eq!(equity.lines().count(), fetched.len() + 1);
    }

    #[test]
    fn high_threshold_blocks_low_confidence_policies() {
        use market_oracle::domain::ohlcv::PriceBar;
        use market_oracle::domain::strategy::ModelPolicy;

        let bars = make_series(30);
        let config = BacktestConfig {
            confidence_threshold: 0.99,
            fill_policy: FillPolicy::AtClose,
            ..BacktestConfig::default()
        };

        // model outputs 0.7 probability: every decision gated to HOLD
        let mut policy = ModelPolicy::new(|_: &[PriceBar]| 0.7);
        let result = run_backtest(&bars, &mut policy, &config).unwrap();
        assert!(result.fills.is_empty());
        assert_relative_eq!(result.final_equity(), config.initial_cash);
    }
}
