//! FYERS v3 REST client.
//!
//! The broker is an opaque remote collaborator: this crate wraps its token
//! endpoints (auth-code exchange, refresh rotation) and market-data
//! endpoints (quotes, option chain, history). No retries — retry policy
//! belongs to the caller.

pub mod auth;
pub mod client;
pub mod error;
pub mod market_data;
pub mod types;

pub use auth::{app_id_hash, TokenPair};
pub use client::{AppCredentials, FyersClient};
pub use error::FyersError;
pub use market_data::atm_strike;
pub use types::{Candle, ExpiryEntry, OptionChainData, OptionChainRow};
