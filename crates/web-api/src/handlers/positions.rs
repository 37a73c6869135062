//! Position CRUD and payoff endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use optsync_data::{NewPosition, Position, PositionPatch};
use optsync_payoff::{margin_summary, payoff_curve, position_pnl, CurvePoint, MarginSummary};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::{AppState, DEFAULT_USER_ID};

/// Position row plus its mark-to-market P&L and display-formatted dates.
#[derive(Debug, Serialize)]
pub struct PositionDto {
    pub id: i64,
    pub symbol: String,
    pub strike: f64,
    pub expiry: String,
    pub option_type: String,
    pub action: String,
    pub quantity: i32,
    pub entry_price: f64,
    pub current_price: f64,
    pub lot_size: i32,
    pub pnl: f64,
    pub trade_date: String,
    pub created_at: String,
}

fn display_date(dt: DateTime<Utc>) -> String {
    dt.format("%d-%m-%Y %H:%M:%S").to_string()
}

fn dto(position: Position) -> PositionDto {
    let pnl = position_pnl(&position);
    PositionDto {
        id: position.id,
        symbol: position.symbol,
        strike: position.strike,
        expiry: position.expiry,
        option_type: position.option_type,
        action: position.action,
        quantity: position.quantity,
        entry_price: position.entry_price,
        current_price: position.current_price,
        lot_size: position.lot_size,
        pnl,
        trade_date: display_date(position.trade_date),
        created_at: display_date(position.created_at),
    }
}

/// Lists all positions with per-row P&L.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PositionDto>>, ApiError> {
    let rows = state.positions.list(DEFAULT_USER_ID).await?;
    Ok(Json(rows.into_iter().map(dto).collect()))
}

/// Adds a position.
///
/// # Errors
/// Returns 400 when a field is missing or malformed; nothing is persisted
/// in that case.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewPosition>,
) -> Result<(StatusCode, Json<PositionDto>), ApiError> {
    new.validate().map_err(ApiError::validation)?;
    let row = state.positions.create(DEFAULT_USER_ID, new, state.now()).await?;
    info!(position_id = row.id, symbol = %row.symbol, "Position added");
    Ok((StatusCode::CREATED, Json(dto(row))))
}

/// Edits quantity and/or prices in place.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<PositionPatch>,
) -> Result<Json<PositionDto>, ApiError> {
    if let Some(quantity) = patch.quantity {
        if quantity < 0 {
            return Err(ApiError::validation("quantity must not be negative"));
        }
    }
    let row = state
        .positions
        .update(id, patch, state.now())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("position {id}")))?;
    Ok(Json(dto(row)))
}

/// Deletes one position.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if state.positions.delete(id).await? {
        Ok(Json(json!({ "message": "Position deleted successfully" })))
    } else {
        Err(ApiError::not_found(format!("position {id}")))
    }
}

/// Deletes every position.
///
/// # Errors
/// Returns an error if the database operation fails.
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.positions.clear(DEFAULT_USER_ID).await?;
    Ok(Json(json!({ "message": "All positions cleared successfully" })))
}

#[derive(Debug, Serialize)]
pub struct PayoffResponse {
    pub payoff_data: Vec<CurvePoint>,
    pub margin_info: MarginSummary,
}

/// Payoff curve and margin summary for the current position set. An empty
/// set yields an empty curve and zeroed summary.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn payoff(State(state): State<Arc<AppState>>) -> Result<Json<PayoffResponse>, ApiError> {
    let rows = state.positions.list(DEFAULT_USER_ID).await?;
    Ok(Json(PayoffResponse {
        payoff_data: payoff_curve(&rows),
        margin_info: margin_summary(&rows),
    }))
}
