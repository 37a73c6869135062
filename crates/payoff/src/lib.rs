//! Option payoff computation.
//!
//! Deterministic, side-effect-free transforms of a position list: a
//! discretized P&L curve over a strike-derived price range, and aggregate
//! premium/P&L statistics. All arithmetic is f64; quantities are taken as
//! stored (lot size is intentionally not folded in, matching the data the
//! frontend has always charted).

pub mod curve;
pub mod summary;

pub use curve::{intrinsic_value, payoff_curve, pnl_at, CurvePoint};
pub use summary::{margin_summary, position_pnl, MarginSummary};
