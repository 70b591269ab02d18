//! Backtest engine: a discrete-event simulation over daily bars.
//!
//! State machine per run: Flat → (BUY accepted) → Long → (SELL accepted) →
//! Flat. Long-only, at most one outstanding order. Each bar either resolves
//! the pending order (no new decision that bar) or queries the policy over
//! history up to and including the current bar — never future bars. The
//! simulation ends when the series is exhausted; an open position stays open
//! and a still-pending order is reported unresolved.

use super::error::OracleError;
use super::ohlcv::{validate_series, PriceBar};
use super::order::{Fill, Order, OrderSize, OrderStatus, Side};
use super::portfolio::PortfolioState;
use super::strategy::{Signal, StrategyPolicy};

/// When a submitted market order executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Submitted at the close of bar t, filled at the open of bar t+1.
    #[default]
    NextOpen,
    /// Filled immediately at the submitting bar's close. Simplified engine
    /// policy, used by the self-tests.
    AtClose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    /// Fixed percentage of each fill's notional, deducted from cash at fill
    /// time. 0.001 = 0.1%.
    pub commission_rate: f64,
    /// Decisions trade only when their confidence strictly exceeds this;
    /// a confidence at or below the threshold is treated as HOLD.
    pub confidence_threshold: f64,
    /// Cash committed per entry (capped by available cash).
    pub allocation_notional: f64,
    pub fill_policy: FillPolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 10_000.0,
            commission_rate: 0.001,
            confidence_threshold: 0.75,
            allocation_notional: 10_000.0,
            fill_policy: FillPolicy::NextOpen,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub portfolio: PortfolioState,
    pub fills: Vec<Fill>,
    pub orders: Vec<Order>,
}

impl BacktestResult {
    /// Order submitted on the final bar that never reached its fill bar.
    pub fn unresolved_order(&self) -> Option<&Order> {
        self.orders
            .iter()
            .find(|o| o.status == OrderStatus::Pending)
    }

    /// Equity at the last recorded bar (cash for an empty series). Open
    /// positions are marked at the final close for reporting only.
    pub fn final_equity(&self) -> f64 {
        self.portfolio
            .equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.portfolio.initial_cash)
    }
}

/// Run a strategy over a historical price series.
///
/// Fails fast on a structurally invalid series (unsorted/duplicate dates) and
/// on a policy emitting a confidence outside [0, 1].
pub fn run_backtest(
    bars: &[PriceBar],
    policy: &mut dyn StrategyPolicy,
    config: &BacktestConfig,
) -> Result<BacktestResult, OracleError> {
    validate_series(bars)?;

    let mut portfolio = PortfolioState::new(config.initial_cash);
    let mut fills: Vec<Fill> = Vec::new();
    let mut orders: Vec<Order> = Vec::new();
    let mut pending: Option<Order> = None;

    for (t, bar) in bars.iter().enumerate() {
        if let Some(order) = pending.take() {
            // Resolution bar: fill or reject at the open, no new decision.
            orders.push(resolve_order(
                order,
                bar.open,
                bar,
                config,
                &mut portfolio,
                &mut fills,
            ));
        } else {
            let decision = policy.decide(&bars[..=t]);
            let signal = gate_confidence(decision.signal, decision.confidence, config)?;

            let order = match signal {
                Signal::Buy if !portfolio.is_long() => {
                    // Reserve headroom for the entry commission so the fill
                    // can never overdraw cash.
                    let notional = config
                        .allocation_notional
                        .min(portfolio.cash / (1.0 + config.commission_rate));
                    Some(Order::market_buy(notional, bar.date))
                }
                Signal::Sell if portfolio.is_long() => {
                    let quantity = portfolio
                        .position
                        .as_ref()
                        .map(|p| p.quantity)
                        .unwrap_or(0);
                    Some(Order::market_sell(quantity, bar.date))
                }
                _ => None,
            };

            if let Some(order) = order {
                match config.fill_policy {
                    FillPolicy::AtClose => orders.push(resolve_order(
                        order,
                        bar.close,
                        bar,
                        config,
                        &mut portfolio,
                        &mut fills,
                    )),
                    FillPolicy::NextOpen => pending = Some(order),
                }
            }
        }

        portfolio.record_equity(bar.date, bar.close);
    }

    // Series exhausted with an order still in flight: report it unresolved.
    if let Some(order) = pending {
        orders.push(order);
    }

    Ok(BacktestResult {
        portfolio,
        fills,
        orders,
    })
}

fn gate_confidence(
    signal: Signal,
    confidence: Option<f64>,
    config: &BacktestConfig,
) -> Result<Signal, OracleError> {
    match confidence {
        Some(c) if !(0.0..=1.0).contains(&c) => Err(OracleError::InvalidConfidence { value: c }),
        Some(c) if c <= config.confidence_threshold => Ok(Signal::Hold),
        _ => Ok(signal),
    }
}

fn resolve_order(
    mut order: Order,
    price: f64,
    bar: &PriceBar,
    config: &BacktestConfig,
    portfolio: &mut PortfolioState,
    fills: &mut Vec<Fill>,
) -> Order {
    let quantity = match order.size {
        // Whole shares only; an allocation too small for one share rejects.
        OrderSize::Notional(notional) => (notional / price).floor() as i64,
        OrderSize::Shares(quantity) => quantity,
    };

    if quantity <= 0 {
        order.status = OrderStatus::Rejected;
        return order;
    }

    let notional = quantity as f64 * price;
    let fill = Fill {
        date: bar.date,
        side: order.side,
        quantity,
        price,
        commission: notional * config.commission_rate,
    };

    portfolio.apply_fill(&fill);
    fills.push(fill);
    order.status = OrderStatus::Filled;
    order
}
