//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod features;
pub mod sentiment;
pub mod merge;
pub mod strategy;
pub mod order;
pub mod portfolio;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
