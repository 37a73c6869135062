//! Wire types for the FYERS data API.
//!
//! Envelopes carry `s` ("ok"/"error") plus an optional message; payload
//! fields default so partially-filled rows (illiquid strikes, index rows)
//! still parse.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct QuotesResponse {
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub d: Vec<QuoteEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteEntry {
    #[serde(default)]
    pub v: QuoteValues,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuoteValues {
    /// Last traded price.
    #[serde(default)]
    pub lp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionChainResponse {
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<OptionChainData>,
}

/// Option chain payload: per-strike rows plus the available expiries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionChainData {
    #[serde(rename = "optionsChain", default)]
    pub options_chain: Vec<OptionChainRow>,
    #[serde(rename = "expiryData", default)]
    pub expiry_data: Vec<ExpiryEntry>,
}

/// One row of the chain — a single option contract (or the underlying row,
/// which FYERS includes with `strike_price` -1).
#[derive(Debug, Clone, Deserialize)]
pub struct OptionChainRow {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub strike_price: f64,
    /// `CE`, `PE`, or empty for the underlying row.
    #[serde(default)]
    pub option_type: String,
    #[serde(default)]
    pub ltp: f64,
    #[serde(default)]
    pub oi: i64,
    #[serde(default)]
    pub iv: f64,
    /// Day change in the premium.
    #[serde(default)]
    pub ch: f64,
}

/// An available expiry as FYERS reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryEntry {
    #[serde(default)]
    pub date: String,
    /// Epoch timestamp FYERS wants echoed back to select this expiry.
    #[serde(default)]
    pub expiry: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub candles: Vec<RawCandle>,
}

/// `[epoch, open, high, low, close, volume]`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCandle(pub i64, pub f64, pub f64, pub f64, pub f64, pub f64);

/// One historical bar.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<RawCandle> for Candle {
    fn from(raw: RawCandle) -> Self {
        Self {
            timestamp: raw.0,
            open: raw.1,
            high: raw.2,
            low: raw.3,
            close: raw.4,
            volume: raw.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_rows_parse_with_missing_fields() {
        let json = r#"{
            "optionsChain": [
                {"symbol": "NSE:NIFTY25JUL24500CE", "strike_price": 24500,
                 "option_type": "CE", "ltp": 120.5, "oi": 100, "iv": 14.2, "ch": -3.1},
                {"symbol": "NSE:NIFTY50-INDEX", "strike_price": -1}
            ],
            "expiryData": [{"date": "03-07-2025", "expiry": 1751524200}]
        }"#;
        let data: OptionChainData = serde_json::from_str(json).unwrap();
        assert_eq!(data.options_chain.len(), 2);
        assert_eq!(data.options_chain[0].strike_price, 24_500.0);
        assert_eq!(data.options_chain[1].option_type, "");
        assert_eq!(data.expiry_data[0].expiry, 1_751_524_200);
    }

    #[test]
    fn candles_parse_from_arrays() {
        let json = r#"{"s": "ok", "candles": [[1751340600, 100.0, 110.5, 99.0, 108.0, 12000]]}"#;
        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        let candle: Candle = response.candles.into_iter().next().unwrap().into();
        assert_eq!(candle.timestamp, 1_751_340_600);
        assert_eq!(candle.close, 108.0);
    }
}
