//! Market-data proxy endpoints — spot quotes, option chain, history.
//!
//! These are thin passes through the FYERS client using the stored access
//! token. Responses opportunistically seed the live-data cache so the
//! lightweight `/api/live_data` poll has something to serve between
//! refreshes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Duration;
use optsync_core::LiveTick;
use optsync_fyers::{atm_strike, Candle, ExpiryEntry, OptionChainRow};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::state::{AppState, DEFAULT_USER_ID};

/// Stored access token and app client id for the FYERS row.
async fn fyers_credentials(state: &AppState) -> Result<(String, String), ApiError> {
    let row = state
        .brokers
        .find_by_broker("fyers", DEFAULT_USER_ID)
        .await?
        .ok_or_else(|| ApiError::configuration("Broker credentials not found"))?;

    match (row.access_token, row.clientid) {
        (Some(token), Some(client_id)) if !token.is_empty() => Ok((token, client_id)),
        _ => Err(ApiError::configuration("Broker credentials not found")),
    }
}

fn seed_cache(state: &AppState, symbol: &str, ltp: f64, oi: i64) {
    let now = state.now();
    state.live_cache.lock().insert(
        symbol,
        LiveTick {
            ltp,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            volume: 0,
            oi,
            received_at: now,
        },
        now,
    );
}

#[derive(Debug, Deserialize)]
pub struct SpotQuery {
    #[serde(default)]
    pub symbol: String,
}

/// Current spot price for a symbol.
///
/// # Errors
/// Returns 400 without a symbol, 403 without stored credentials, 502 when
/// FYERS fails.
pub async fn spot_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SpotQuery>,
) -> Result<Json<Value>, ApiError> {
    if query.symbol.is_empty() {
        return Err(ApiError::validation("Symbol parameter required"));
    }
    let (access_token, client_id) = fyers_credentials(&state).await?;

    let spot = state
        .fyers
        .quote(&access_token, &client_id, &query.symbol)
        .await?;
    seed_cache(&state, &query.symbol, spot, 0);

    Ok(Json(json!({
        "symbol": query.symbol,
        "spot_price": spot,
        "status": "success",
    })))
}

#[derive(Debug, Deserialize)]
pub struct OptionChainRequest {
    #[serde(default)]
    pub symbol: String,
    /// Expiry epoch as FYERS reports it in `expiryData`.
    pub expiry: Option<i64>,
    #[serde(default = "default_strike_count")]
    pub strike_count: u32,
}

fn default_strike_count() -> u32 {
    10
}

/// Call and put quotes side by side for one strike.
#[derive(Debug, Default, Serialize)]
pub struct StrikeEntry {
    pub strike: f64,
    pub ce_symbol: String,
    pub pe_symbol: String,
    pub ce_ltp: f64,
    pub pe_ltp: f64,
    pub ce_oi: i64,
    pub pe_oi: i64,
    pub ce_iv: f64,
    pub pe_iv: f64,
    pub ce_change: f64,
    pub pe_change: f64,
    pub is_atm: bool,
}

#[derive(Debug, Serialize)]
pub struct OptionChainResponse {
    pub symbol: String,
    pub spot_price: f64,
    pub atm_strike: Option<f64>,
    pub strikes: Vec<StrikeEntry>,
    pub expiry_data: Vec<ExpiryEntry>,
}

/// Groups raw chain rows by strike, pairing calls and puts.
fn group_by_strike(rows: &[OptionChainRow], atm: Option<f64>) -> Vec<StrikeEntry> {
    // Key on hundredths of a point so f64 strikes can index a sorted map.
    let mut strikes: BTreeMap<i64, StrikeEntry> = BTreeMap::new();

    for row in rows {
        if row.strike_price <= 0.0 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let key = (row.strike_price * 100.0).round() as i64;
        let entry = strikes.entry(key).or_insert_with(|| StrikeEntry {
            strike: row.strike_price,
            is_atm: Some(row.strike_price) == atm,
            ..StrikeEntry::default()
        });

        match row.option_type.as_str() {
            "CE" => {
                entry.ce_symbol = row.symbol.clone();
                entry.ce_ltp = row.ltp;
                entry.ce_oi = row.oi;
                entry.ce_iv = row.iv;
                entry.ce_change = row.ch;
            }
            "PE" => {
                entry.pe_symbol = row.symbol.clone();
                entry.pe_ltp = row.ltp;
                entry.pe_oi = row.oi;
                entry.pe_iv = row.iv;
                entry.pe_change = row.ch;
            }
            _ => {}
        }
    }

    strikes.into_values().collect()
}

/// Option chain for a symbol with ATM detection and paired strikes.
///
/// # Errors
/// Returns 400 without a symbol, 403 without stored credentials, 502 when
/// FYERS fails, 404 when the chain comes back empty.
pub async fn option_chain(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OptionChainRequest>,
) -> Result<Json<OptionChainResponse>, ApiError> {
    if request.symbol.is_empty() {
        return Err(ApiError::validation("Symbol and expiry are required"));
    }
    let (access_token, client_id) = fyers_credentials(&state).await?;

    // Spot failure degrades ATM detection but should not kill the chain.
    let spot = match state
        .fyers
        .quote(&access_token, &client_id, &request.symbol)
        .await
    {
        Ok(spot) => spot,
        Err(e) => {
            warn!(symbol = %request.symbol, error = %e, "Spot quote failed, ATM detection degraded");
            0.0
        }
    };

    let chain = state
        .fyers
        .option_chain(
            &access_token,
            &client_id,
            &request.symbol,
            request.expiry,
            request.strike_count,
        )
        .await?;

    if chain.options_chain.is_empty() {
        return Err(ApiError::not_found("No option data found"));
    }

    for row in &chain.options_chain {
        if !row.symbol.is_empty() && row.strike_price > 0.0 {
            seed_cache(&state, &row.symbol, row.ltp, row.oi);
        }
    }
    if spot > 0.0 {
        seed_cache(&state, &request.symbol, spot, 0);
    }

    // The cache may hold fresher ticks than the REST snapshot; its value
    // wins for the response.
    let mut rows = chain.options_chain;
    {
        let now = state.now();
        let mut cache = state.live_cache.lock();
        for row in &mut rows {
            if let Some(tick) = cache.get(&row.symbol, now) {
                row.ltp = tick.ltp;
            }
        }
    }

    let atm = atm_strike(&rows, spot);
    let strikes = group_by_strike(&rows, atm);

    Ok(Json(OptionChainResponse {
        symbol: request.symbol,
        spot_price: spot,
        atm_strike: atm,
        strikes,
        expiry_data: chain.expiry_data,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub resolution: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub resolution: String,
    pub candles: Vec<Candle>,
    pub count: usize,
}

/// Recent intraday history for an option symbol (last 4 days), for the
/// microchart sparklines.
///
/// # Errors
/// Returns 403 without stored credentials, 502 when FYERS fails.
pub async fn option_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (access_token, client_id) = fyers_credentials(&state).await?;
    let resolution = query.resolution.unwrap_or_else(|| "1".to_string());

    let to = state.now();
    let from = to - Duration::days(4);

    let candles = state
        .fyers
        .history(
            &access_token,
            &client_id,
            &symbol,
            &resolution,
            &from.format("%Y-%m-%d").to_string(),
            &to.format("%Y-%m-%d").to_string(),
        )
        .await?;

    Ok(Json(HistoryResponse {
        count: candles.len(),
        symbol,
        resolution,
        candles,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LiveDataQuery {
    #[serde(default)]
    pub symbol: String,
}

/// Last cached tick for a symbol, if the cache holds a fresh one.
///
/// # Errors
/// Returns 400 without a symbol, 404 on a cache miss.
pub async fn live_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LiveDataQuery>,
) -> Result<Json<Value>, ApiError> {
    if query.symbol.is_empty() {
        return Err(ApiError::validation("Symbol parameter required"));
    }
    let now = state.now();
    let tick = state
        .live_cache
        .lock()
        .get(&query.symbol, now)
        .ok_or_else(|| ApiError::not_found(format!("No live data for symbol {}", query.symbol)))?;

    Ok(Json(json!({ "symbol": query.symbol, "data": tick })))
}
