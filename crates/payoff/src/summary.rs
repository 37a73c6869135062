//! Aggregate premium and P&L statistics.

use optsync_data::Position;
use serde::Serialize;

/// Summary block rendered next to the payoff chart.
#[derive(Debug, Clone, Serialize)]
pub struct MarginSummary {
    /// Net premium: paid (buy) minus received (sell).
    pub total_premium: f64,
    /// Mark-to-market P&L across all positions.
    pub current_pnl: f64,
    /// Reserved for unbounded-risk detection; always 0 for now.
    pub max_profit: f64,
    /// Reserved for unbounded-risk detection; always 0 for now.
    pub max_loss: f64,
    pub position_count: usize,
}

impl MarginSummary {
    fn empty() -> Self {
        Self {
            total_premium: 0.0,
            current_pnl: 0.0,
            max_profit: 0.0,
            max_loss: 0.0,
            position_count: 0,
        }
    }
}

/// Realized-to-date P&L of one position, marking against its stored
/// `current_price` (not re-derived intrinsic value).
#[must_use]
pub fn position_pnl(position: &Position) -> f64 {
    let quantity = f64::from(position.quantity);
    if position.is_buy() {
        (position.current_price - position.entry_price) * quantity
    } else {
        (position.entry_price - position.current_price) * quantity
    }
}

/// Computes premium and P&L totals for the position set.
///
/// An empty set is a defined terminal case: all-zero summary, not an error.
#[must_use]
pub fn margin_summary(positions: &[Position]) -> MarginSummary {
    if positions.is_empty() {
        return MarginSummary::empty();
    }

    let mut total_premium = 0.0;
    let mut current_pnl = 0.0;

    for position in positions {
        let premium = position.entry_price * f64::from(position.quantity);
        if position.is_buy() {
            total_premium += premium;
        } else {
            total_premium -= premium;
        }
        current_pnl += position_pnl(position);
    }

    MarginSummary {
        total_premium: round2(total_premium),
        current_pnl: round2(current_pnl),
        max_profit: 0.0,
        max_loss: 0.0,
        position_count: positions.len(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
