//! Market-data queries — spot quotes, option chain, historical candles.

use tracing::debug;

use crate::client::FyersClient;
use crate::error::FyersError;
use crate::types::{
    Candle, HistoryResponse, OptionChainData, OptionChainResponse, OptionChainRow, QuotesResponse,
};

const QUOTES_PATH: &str = "/data/quotes";
const OPTION_CHAIN_PATH: &str = "/data/options-chain-v3";
const HISTORY_PATH: &str = "/data/history";

impl FyersClient {
    /// Last traded price for a symbol.
    ///
    /// # Errors
    /// Returns an error if the request fails, FYERS reports a non-ok
    /// status, or the response carries no quote data.
    pub async fn quote(
        &self,
        access_token: &str,
        client_id: &str,
        symbol: &str,
    ) -> Result<f64, FyersError> {
        debug!(symbol, "Fetching spot quote");
        let response: QuotesResponse = self
            .get_data(
                QUOTES_PATH,
                access_token,
                client_id,
                &[("symbols", symbol.to_string())],
            )
            .await?;

        if response.s != "ok" {
            return Err(FyersError::api(
                200,
                response.message.unwrap_or_else(|| "quote request failed".to_string()),
            ));
        }

        response
            .d
            .first()
            .map(|entry| entry.v.lp)
            .ok_or_else(|| FyersError::Decode(format!("no quote data for {symbol}")))
    }

    /// Option chain for a symbol, optionally pinned to one expiry epoch.
    ///
    /// # Errors
    /// Returns an error if the request fails or FYERS reports a non-ok
    /// status.
    pub async fn option_chain(
        &self,
        access_token: &str,
        client_id: &str,
        symbol: &str,
        expiry_ts: Option<i64>,
        strike_count: u32,
    ) -> Result<OptionChainData, FyersError> {
        debug!(symbol, strike_count, "Fetching option chain");
        let mut query = vec![
            ("symbol", symbol.to_string()),
            ("strikecount", strike_count.to_string()),
        ];
        if let Some(ts) = expiry_ts {
            query.push(("timestamp", ts.to_string()));
        }

        let response: OptionChainResponse = self
            .get_data(OPTION_CHAIN_PATH, access_token, client_id, &query)
            .await?;

        if response.s != "ok" {
            return Err(FyersError::api(
                200,
                response
                    .message
                    .unwrap_or_else(|| "option chain request failed".to_string()),
            ));
        }

        Ok(response.data.unwrap_or_default())
    }

    /// Historical candles for a symbol between two `YYYY-MM-DD` dates.
    ///
    /// # Errors
    /// Returns an error if the request fails or FYERS reports a non-ok
    /// status.
    pub async fn history(
        &self,
        access_token: &str,
        client_id: &str,
        symbol: &str,
        resolution: &str,
        range_from: &str,
        range_to: &str,
    ) -> Result<Vec<Candle>, FyersError> {
        debug!(symbol, resolution, range_from, range_to, "Fetching history");
        let response: HistoryResponse = self
            .get_data(
                HISTORY_PATH,
                access_token,
                client_id,
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", resolution.to_string()),
                    ("date_format", "1".to_string()),
                    ("range_from", range_from.to_string()),
                    ("range_to", range_to.to_string()),
                    ("cont_flag", "1".to_string()),
                ],
            )
            .await?;

        if response.s != "ok" {
            return Err(FyersError::api(
                200,
                response
                    .message
                    .unwrap_or_else(|| "history request failed".to_string()),
            ));
        }

        Ok(response.candles.into_iter().map(Candle::from).collect())
    }
}

/// The strike nearest the spot price, ignoring non-option rows.
#[must_use]
pub fn atm_strike(rows: &[OptionChainRow], spot: f64) -> Option<f64> {
    rows.iter()
        .filter(|row| row.strike_price > 0.0)
        .min_by(|a, b| {
            (a.strike_price - spot)
                .abs()
                .total_cmp(&(b.strike_price - spot).abs())
        })
        .map(|row| row.strike_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(strike: f64) -> OptionChainRow {
        OptionChainRow {
            symbol: String::new(),
            strike_price: strike,
            option_type: "CE".to_string(),
            ltp: 0.0,
            oi: 0,
            iv: 0.0,
            ch: 0.0,
        }
    }

    #[test]
    fn atm_picks_nearest_strike() {
        let rows = vec![row(-1.0), row(24_400.0), row(24_500.0), row(24_600.0)];
        assert_eq!(atm_strike(&rows, 24_530.0), Some(24_500.0));
    }

    #[test]
    fn atm_is_none_without_option_rows() {
        assert_eq!(atm_strike(&[row(-1.0)], 100.0), None);
        assert_eq!(atm_strike(&[], 100.0), None);
    }
}
