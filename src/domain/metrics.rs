//! Summary statistics over a backtest result.

use super::backtest::BacktestResult;
use super::order::Side;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_equity: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub round_trips: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub total_commission: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let initial = result.portfolio.initial_cash;
        let final_equity = result.final_equity();

        let total_return = if initial > 0.0 {
            (final_equity - initial) / initial
        } else {
            0.0
        };

        let max_drawdown = compute_max_drawdown(
            result
                .portfolio
                .equity_curve
                .iter()
                .map(|p| p.equity),
        );

        // Pair each buy fill with the sell that closes it; a trailing open
        // position contributes no round trip.
        let mut round_trips = 0usize;
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut entry: Option<(f64, f64)> = None; // (price, commission)

        for fill in &result.fills {
            match fill.side {
                Side::Buy => entry = Some((fill.price, fill.commission)),
                Side::Sell => {
                    if let Some((entry_price, entry_commission)) = entry.take() {
                        round_trips += 1;
                        let pnl = fill.quantity as f64 * (fill.price - entry_price)
                            - entry_commission
                            - fill.commission;
                        if pnl > 0.0 {
                            trades_won += 1;
                        } else if pnl < 0.0 {
                            trades_lost += 1;
                        }
                    }
                }
            }
        }

        let win_rate = if round_trips > 0 {
            trades_won as f64 / round_trips as f64
        } else {
            0.0
        };

        let total_commission = result.fills.iter().map(|f| f.commission).sum();

        Metrics {
            final_equity,
            total_return,
            max_drawdown,
            round_trips,
            trades_won,
            trades_lost,
            win_rate,
            total_commission,
        }
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
fn compute_max_drawdown(equity: impl Iterator<Item = f64>) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0;

    for e in equity {
        if e > peak {
            peak = e;
        }
        if peak > 0.0 {
            let dd = (peak - e) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
