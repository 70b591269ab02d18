//! Orders, fills, and position tracking.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Filled,
    Rejected,
}

/// How much of the market order to execute: buys commit cash, sells close a
/// share count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderSize {
    Notional(f64),
    Shares(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub side: Side,
    pub size: OrderSize,
    pub submitted: NaiveDate,
    pub status: OrderStatus,
}

impl Order {
    pub fn market_buy(notional: f64, submitted: NaiveDate) -> Self {
        Order {
            side: Side::Buy,
            size: OrderSize::Notional(notional),
            submitted,
            status: OrderStatus::Pending,
        }
    }

    pub fn market_sell(quantity: i64, submitted: NaiveDate) -> Self {
        Order {
            side: Side::Sell,
            size: OrderSize::Shares(quantity),
            submitted,
            status: OrderStatus::Pending,
        }
    }
}

/// Execution of an order at a specific price and date.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub date: NaiveDate,
    pub side: Side,
    pub quantity: i64,
    pub price: f64,
    pub commission: f64,
}

impl Fill {
    pub fn notional(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub quantity: i64,
    pub average_cost: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.average_cost)
    }
}
