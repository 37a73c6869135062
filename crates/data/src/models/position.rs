//! Option position records for synchronized trading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire values for the option type column.
pub const OPTION_CALL: &str = "CE";
/// Wire value for a put.
pub const OPTION_PUT: &str = "PE";
/// Wire values for the action column.
pub const ACTION_BUY: &str = "BUY";
/// Wire value for a sold position.
pub const ACTION_SELL: &str = "SELL";

/// An open option position.
///
/// `quantity` is sign-free; direction is carried by `action`. `lot_size` is
/// stored alongside but never folded into quantity — the columns are
/// independent and P&L math uses `quantity` alone.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub strike: f64,
    pub expiry: String,
    /// `CE` (call) or `PE` (put).
    pub option_type: String,
    /// `BUY` or `SELL`.
    pub action: String,
    pub quantity: i32,
    pub entry_price: f64,
    pub current_price: f64,
    pub lot_size: i32,
    pub trade_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// True for call options.
    #[must_use]
    pub fn is_call(&self) -> bool {
        self.option_type == OPTION_CALL
    }

    /// True for bought positions.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.action == ACTION_BUY
    }
}

/// Fields required to create a position.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPosition {
    pub symbol: String,
    pub strike: f64,
    pub expiry: String,
    pub option_type: String,
    pub action: String,
    pub quantity: i32,
    pub entry_price: f64,
    pub current_price: f64,
    #[serde(default = "default_lot_size")]
    pub lot_size: i32,
}

fn default_lot_size() -> i32 {
    75
}

impl NewPosition {
    /// Rejects malformed field values before anything touches the database.
    ///
    /// # Errors
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err("strike must be a positive number".to_string());
        }
        if self.expiry.is_empty() {
            return Err("expiry must not be empty".to_string());
        }
        if self.option_type != OPTION_CALL && self.option_type != OPTION_PUT {
            return Err(format!("option_type must be CE or PE, got {}", self.option_type));
        }
        if self.action != ACTION_BUY && self.action != ACTION_SELL {
            return Err(format!("action must be BUY or SELL, got {}", self.action));
        }
        if self.lot_size <= 0 {
            return Err("lot_size must be a positive integer".to_string());
        }
        Ok(())
    }
}

/// Partial update: only price and quantity edits are supported in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionPatch {
    pub quantity: Option<i32>,
    pub entry_price: Option<f64>,
    pub current_price: Option<f64>,
}
