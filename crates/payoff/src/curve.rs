//! Payoff curve construction.

use optsync_data::Position;
use serde::Serialize;

/// Fraction of the strike range padded on each side of the scan.
const RANGE_PADDING: f64 = 0.2;

/// Number of steps the scan range is divided into.
const SCAN_STEPS: f64 = 100.0;

/// One point on the payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub price: f64,
    pub pnl: f64,
}

/// Intrinsic value of a position's option at hypothetical underlying
/// price `price`.
#[must_use]
pub fn intrinsic_value(position: &Position, price: f64) -> f64 {
    if position.is_call() {
        (price - position.strike).max(0.0)
    } else {
        (position.strike - price).max(0.0)
    }
}

/// Signed P&L of one position at hypothetical underlying price `price`.
///
/// Quantity alone scales the result; `lot_size` is stored on the record but
/// deliberately not multiplied in.
#[must_use]
pub fn pnl_at(position: &Position, price: f64) -> f64 {
    let intrinsic = intrinsic_value(position, price);
    let quantity = f64::from(position.quantity);
    if position.is_buy() {
        (intrinsic - position.entry_price) * quantity
    } else {
        (position.entry_price - intrinsic) * quantity
    }
}

/// Computes the total-P&L curve across all positions.
///
/// The scan runs from 20% below the lowest strike (floored at zero) to 20%
/// above the highest, in `max(1, span/100)` increments — at most ~101
/// points, and never a sub-unit step even when every strike coincides.
/// Prices accumulate in floating point on purpose; the final point may land
/// within one step of the end without special-casing. An empty position set
/// yields an empty curve, not an error.
#[must_use]
pub fn payoff_curve(positions: &[Position]) -> Vec<CurvePoint> {
    if positions.is_empty() {
        return Vec::new();
    }

    let min_strike = positions.iter().map(|p| p.strike).fold(f64::INFINITY, f64::min);
    let max_strike = positions
        .iter()
        .map(|p| p.strike)
        .fold(f64::NEG_INFINITY, f64::max);

    let range = max_strike - min_strike;
    let start = (min_strike - range * RANGE_PADDING).max(0.0);
    let end = max_strike + range * RANGE_PADDING;
    let step = ((end - start) / SCAN_STEPS).max(1.0);

    let mut points = Vec::new();
    let mut price = start;
    while price <= end {
        let total_pnl: f64 = positions.iter().map(|p| pnl_at(p, price)).sum();
        points.push(CurvePoint {
            price,
            pnl: total_pnl,
        });
        price += step;
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::tests::make_position;

    #[test]
    fn bought_call_pnl_shape() {
        // Strike 100, entry 5, qty 1: flat -5 below strike, breakeven 105.
        let pos = make_position("CE", "BUY", 100.0, 5.0, 1, 0.0);
        assert_eq!(pnl_at(&pos, 100.0), -5.0);
        assert_eq!(pnl_at(&pos, 110.0), 5.0);
        assert_eq!(pnl_at(&pos, 95.0), -5.0);
    }

    #[test]
    fn sold_put_pnl_shape() {
        // Strike 100, entry 5, qty 1: premium kept above strike.
        let pos = make_position("PE", "SELL", 100.0, 5.0, 1, 0.0);
        assert_eq!(pnl_at(&pos, 100.0), 5.0);
        assert_eq!(pnl_at(&pos, 90.0), -5.0);
        assert_eq!(pnl_at(&pos, 105.0), 5.0);
    }

    #[test]
    fn quantity_scales_pnl_but_lot_size_does_not() {
        let mut pos = make_position("CE", "BUY", 100.0, 5.0, 3, 0.0);
        pos.lot_size = 75;
        assert_eq!(pnl_at(&pos, 110.0), 15.0);
    }

    #[test]
    fn empty_positions_give_empty_curve() {
        assert!(payoff_curve(&[]).is_empty());
    }

    #[test]
    fn curve_spans_padded_strike_range_in_ascending_order() {
        let positions = vec![
            make_position("CE", "BUY", 100.0, 5.0, 1, 0.0),
            make_position("PE", "SELL", 200.0, 8.0, 1, 0.0),
        ];
        let curve = payoff_curve(&positions);
        // range 100, padded scan 80..=220, step 1.4.
        assert!((curve[0].price - 80.0).abs() < 1e-9);
        assert!(curve.len() <= 101);
        assert!(curve.windows(2).all(|w| w[0].price < w[1].price));
        assert!(curve.last().unwrap().price <= 220.0);
    }

    #[test]
    fn single_strike_uses_unit_step() {
        // All strikes equal: range 0, step clamps to 1, a single point.
        let positions = vec![
            make_position("CE", "BUY", 100.0, 5.0, 1, 0.0),
            make_position("PE", "BUY", 100.0, 4.0, 1, 0.0),
        ];
        let curve = payoff_curve(&positions);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].price, 100.0);
        // Long straddle at the strike: both legs lose their premium.
        assert_eq!(curve[0].pnl, -9.0);
    }

    #[test]
    fn curve_sums_across_positions() {
        let positions = vec![
            make_position("CE", "BUY", 100.0, 5.0, 1, 0.0),
            make_position("CE", "SELL", 100.0, 5.0, 1, 0.0),
        ];
        // Opposite legs cancel everywhere.
        assert!(payoff_curve(&positions).iter().all(|p| p.pnl == 0.0));
    }

    #[test]
    fn scan_start_never_goes_negative() {
        let positions = vec![
            make_position("CE", "BUY", 1.0, 0.5, 1, 0.0),
            make_position("CE", "BUY", 500.0, 2.0, 1, 0.0),
        ];
        let curve = payoff_curve(&positions);
        assert_eq!(curve[0].price, 0.0);
    }
}
