//! Portfolio state and equity tracking.
//!
//! State is mutated only by fill events and advances monotonically in
//! simulated time; the engine owns the ordering.

use chrono::NaiveDate;

use super::order::{Fill, Position, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub initial_cash: f64,
    pub position: Option<Position>,
    pub realized_pnl: f64,
    pub equity_curve: Vec<EquityPoint>,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioState {
            cash: initial_cash,
            initial_cash,
            position: None,
            realized_pnl: 0.0,
            equity_curve: Vec::new(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.position.as_ref().is_some_and(|p| p.quantity > 0)
    }

    /// Apply a fill. Buys open a position at the fill price; sells close the
    /// entire position and realize quantity * (exit - entry) minus the sell
    /// commission. Buy commissions reduce cash at fill time.
    pub fn apply_fill(&mut self, fill: &Fill) {
        match fill.side {
            Side::Buy => {
                self.cash -= fill.notional() + fill.commission;
                self.position = Some(Position {
                    quantity: fill.quantity,
                    average_cost: fill.price,
                });
            }
            Side::Sell => {
                self.cash += fill.notional() - fill.commission;
                if let Some(pos) = self.position.take() {
                    self.realized_pnl +=
                        fill.quantity as f64 * (fill.price - pos.average_cost) - fill.commission;
                }
            }
        }
    }

    pub fn record_equity(&mut self, date: NaiveDate, price: f64) {
        let equity = self.total_equity(price);
        self.equity_curve.push(EquityPoint { date, equity });
    }

    /// Cash plus open position marked at `price`.
    pub fn total_equity(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map(|p| p.market_value(price))
            .unwrap_or(0.0);
        self.cash + position_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn new_portfolio() {
        let p = PortfolioState::new(10_000.0);
        assert_relative_eq!(p.cash, 10_000.0);
        assert_relative_eq!(p.realized_pnl, 0.0);
        assert!(p.position.is_none());
        assert!(p.equity_curve.is_empty());
        assert!(!p.is_long());
    }

    #[test]
    fn buy_fill_opens_position_and_deducts_cash() {
        let mut p = PortfolioState::new(10_000.0);
        p.apply_fill(&Fill {
            date: date(),
            side: Side::Buy,
            quantity: 50,
            price: 100.0,
            commission: 5.0,
        });

        assert_relative_eq!(p.cash, 10_000.0 - 5000.0 - 5.0);
        assert!(p.is_long());
        let pos = p.position.as_ref().unwrap();
        assert_eq!(pos.quantity, 50);
        assert_relative_eq!(pos.average_cost, 100.0);
    }

    #[test]
    fn sell_fill_closes_position_and_realizes_pnl() {
        let mut p = PortfolioState::new(10_000.0);
        p.apply_fill(&Fill {
            date: date(),
            side: Side::Buy,
            quantity: 50,
            price: 100.0,
            commission: 0.0,
        });
        p.apply_fill(&Fill {
            date: date(),
            side: Side::Sell,
            quantity: 50,
            price: 110.0,
            commission: 5.5,
        });

        assert!(p.position.is_none());
        assert_relative_eq!(p.cash, 10_000.0 + 50.0 * 10.0 - 5.5);
        assert_relative_eq!(p.realized_pnl, 500.0 - 5.5);
    }

    #[test]
    fn total_equity_marks_open_position() {
        let mut p = PortfolioState::new(10_000.0);
        p.apply_fill(&Fill {
            date: date(),
            side: Side::Buy,
            quantity: 50,
            price: 100.0,
            commission: 0.0,
        });

        assert_relative_eq!(p.total_equity(100.0), 10_000.0);
        assert_relative_eq!(p.total_equity(120.0), 11_000.0);
    }

    #[test]
    fn record_equity_appends_points() {
        let mut p = PortfolioState::new(10_000.0);
        p.record_equity(date(), 100.0);
        assert_eq!(p.equity_curve.len(), 1);
        assert_relative_eq!(p.equity_curve[0].equity, 10_000.0);
    }
}
