//! Configuration validation.
//!
//! Validates all recognised config options before a pipeline or backtest run.

use crate::domain::error::OracleError;
use crate::ports::config_port::ConfigPort;

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), OracleError> {
    validate_period(config, "rsi_period", 14, 1)?;
    validate_period(config, "macd_fast", 12, 1)?;
    validate_period(config, "macd_slow", 26, 1)?;
    validate_period(config, "macd_signal", 9, 1)?;
    // sample standard deviation needs at least two observations per window
    validate_period(config, "bb_period", 20, 2)?;
    validate_period(config, "vol_window", 21, 2)?;
    validate_macd_ordering(config)?;
    validate_bb_k(config)?;
    validate_price_column(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), OracleError> {
    validate_initial_cash(config)?;
    validate_commission_rate(config)?;
    validate_confidence_threshold(config)?;
    validate_allocation_notional(config)?;
    validate_fill_policy(config)?;
    Ok(())
}

fn validate_period(
    config: &dyn ConfigPort,
    key: &str,
    default: i64,
    min: i64,
) -> Result<(), OracleError> {
    let value = config.get_int("indicators", key, default);
    if value < min {
        return Err(OracleError::ConfigInvalid {
            section: "indicators".to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least {}", key, min),
        });
    }
    Ok(())
}

fn validate_macd_ordering(config: &dyn ConfigPort) -> Result<(), OracleError> {
    let fast = config.get_int("indicators", "macd_fast", 12);
    let slow = config.get_int("indicators", "macd_slow", 26);
    if fast >= slow {
        return Err(OracleError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "macd_fast".to_string(),
            reason: "macd_fast must be smaller than macd_slow".to_string(),
        });
    }
    Ok(())
}

fn validate_bb_k(config: &dyn ConfigPort) -> Result<(), OracleError> {
    let value = config.get_double("indicators", "bb_k", 2.0);
    if value <= 0.0 {
        return Err(OracleError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "bb_k".to_string(),
            reason: "bb_k must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_price_column(config: &dyn ConfigPort) -> Result<(), OracleError> {
    use crate::domain::features::PriceColumn;

    if let Some(name) = config.get_string("indicators", "price_column") {
        if PriceColumn::parse(&name).is_none() {
            return Err(OracleError::ConfigInvalid {
                section: "indicators".to_string(),
                key: "price_column".to_string(),
                reason: format!("unknown price column '{}'", name),
            });
        }
    }
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), OracleError> {
    let value = config.get_double("backtest", "initial_cash", 10_000.0);
    if value <= 0.0 {
        return Err(OracleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), OracleError> {
    let value = config.get_double("backtest", "commission_rate", 0.001);
    if !(0.0..1.0).contains(&value) {
        return Err(OracleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission_rate".to_string(),
            reason: "commission_rate must be in [0, 1)".to_string(),
        });
    }
    Ok(())
}

fn validate_confidence_threshold(config: &dyn ConfigPort) -> Result<(), OracleError> {
    let value = config.get_double("backtest", "confidence_threshold", 0.75);
    if !(0.0..=1.0).contains(&value) {
        return Err(OracleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "confidence_threshold".to_string(),
            reason: "confidence_threshold must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_allocation_notional(config: &dyn ConfigPort) -> Result<(), OracleError> {
    let value = config.get_double("backtest", "allocation_notional", 10_000.0);
    if value <= 0.0 {
        return Err(OracleError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "allocation_notional".to_string(),
            reason: "allocation_notional must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_fill_policy(config: &dyn ConfigPort) -> Result<(), OracleError> {
    if let Some(value) = config.get_string("backtest", "fill_policy") {
        match value.to_lowercase().as_str() {
            "next_open" | "at_close" => {}
            _ => {
                return Err(OracleError::ConfigInvalid {
                    section: "backtest".to_string(),
                    key: "fill_policy".to_string(),
                    reason: "fill_policy must be next_open or at_close".to_string(),
                })
            }
        }
    }
    Ok(())
}
