//! Broker settings CRUD and token lifecycle endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Asia::Kolkata;
use optsync_data::{BrokerSettings, BrokerSettingsPatch, NewBrokerSettings};
use optsync_fyers::AppCredentials;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::{AppState, DEFAULT_USER_ID};

/// Credential row as the settings UI sees it: token material included,
/// creation timestamps rendered as IST wall-clock strings.
#[derive(Debug, Serialize)]
pub struct BrokerSettingsDto {
    pub id: i64,
    pub brokername: String,
    pub broker_user_id: String,
    pub app_name: Option<String>,
    pub app_source: Option<String>,
    pub clientid: Option<String>,
    pub appkey: Option<String>,
    pub redirect_url: Option<String>,
    pub pin: Option<String>,
    pub useremail: Option<String>,
    pub usermobileno: Option<String>,
    pub pan: Option<String>,
    pub dob: Option<NaiveDate>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub access_token_created_at: Option<String>,
    pub refresh_token_created_at: Option<String>,
}

fn ist_string(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.map(|dt| {
        dt.with_timezone(&Kolkata)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}

fn dto(row: BrokerSettings) -> BrokerSettingsDto {
    BrokerSettingsDto {
        id: row.id,
        brokername: row.brokername,
        broker_user_id: row.broker_user_id,
        app_name: row.app_name,
        app_source: row.app_source,
        clientid: row.clientid,
        appkey: row.appkey,
        redirect_url: row.redirect_url,
        pin: row.pin,
        useremail: row.useremail,
        usermobileno: row.usermobileno,
        pan: row.pan,
        dob: row.dob,
        access_token: row.access_token,
        refresh_token: row.refresh_token,
        access_token_created_at: ist_string(row.access_token_created_at),
        refresh_token_created_at: ist_string(row.refresh_token_created_at),
    }
}

fn require_fyers(row: &BrokerSettings) -> Result<(), ApiError> {
    if row.brokername.eq_ignore_ascii_case("fyers") {
        Ok(())
    } else {
        Err(ApiError::validation("Select a valid broker for this action"))
    }
}

fn app_credentials(row: &BrokerSettings) -> Result<AppCredentials, ApiError> {
    let client_id = row
        .clientid
        .clone()
        .ok_or_else(|| ApiError::configuration("clientid is not configured for this broker"))?;
    let secret_key = row
        .appkey
        .clone()
        .ok_or_else(|| ApiError::configuration("appkey is not configured for this broker"))?;
    Ok(AppCredentials {
        client_id,
        secret_key,
    })
}

async fn fetch(state: &AppState, id: i64) -> Result<BrokerSettings, ApiError> {
    state
        .brokers
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("broker settings {id}")))
}

/// Lists all credential rows.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BrokerSettingsDto>>, ApiError> {
    let rows = state.brokers.list(DEFAULT_USER_ID).await?;
    Ok(Json(rows.into_iter().map(dto).collect()))
}

/// Creates a credential row.
///
/// # Errors
/// Returns 400 if the required identity fields are missing.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewBrokerSettings>,
) -> Result<(StatusCode, Json<BrokerSettingsDto>), ApiError> {
    if new.brokername.is_empty() || new.broker_user_id.is_empty() {
        return Err(ApiError::validation("brokername and broker_user_id required"));
    }
    let row = state.brokers.create(DEFAULT_USER_ID, new).await?;
    info!(broker_id = row.id, brokername = %row.brokername, "Broker settings created");
    Ok((StatusCode::CREATED, Json(dto(row))))
}

/// Applies a partial update. Token fields stamp their creation timestamps.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<BrokerSettingsPatch>,
) -> Result<Json<BrokerSettingsDto>, ApiError> {
    let row = state
        .brokers
        .update(id, patch, state.now())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("broker settings {id}")))?;
    Ok(Json(dto(row)))
}

/// Deletes a credential row.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.brokers.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("broker settings {id}")))
    }
}

/// Token material for the settings page "eye" button.
#[derive(Debug, Serialize)]
pub struct TokenViewDto {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_created_at: Option<String>,
    pub refresh_token_created_at: Option<String>,
}

/// Shows stored tokens and their creation times.
///
/// # Errors
/// Returns 404 for an unknown id.
pub async fn view_tokens(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TokenViewDto>, ApiError> {
    let row = fetch(&state, id).await?;
    Ok(Json(TokenViewDto {
        access_token: row.access_token.clone().unwrap_or_default(),
        refresh_token: row.refresh_token.clone().unwrap_or_default(),
        access_token_created_at: ist_string(row.access_token_created_at),
        refresh_token_created_at: ist_string(row.refresh_token_created_at),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TokenExchangeRequest {
    #[serde(default)]
    pub auth_code: String,
}

/// Exchanges an auth code for a token pair and stores both, stamping both
/// creation timestamps.
///
/// # Errors
/// Returns 400 for a missing auth code or unsupported broker, 403 for
/// missing app credentials, 502 when FYERS rejects the exchange.
pub async fn exchange_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<TokenExchangeRequest>,
) -> Result<Json<BrokerSettingsDto>, ApiError> {
    if request.auth_code.is_empty() {
        return Err(ApiError::validation("auth_code required"));
    }
    let row = fetch(&state, id).await?;
    require_fyers(&row)?;
    let credentials = app_credentials(&row)?;

    let pair = state
        .fyers
        .exchange_auth_code(&credentials, &request.auth_code)
        .await?;

    let updated = state
        .brokers
        .store_exchanged_tokens(id, &pair.access_token, &pair.refresh_token, state.now())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("broker settings {id}")))?;

    info!(broker_id = id, "Stored exchanged token pair");
    Ok(Json(dto(updated)))
}

/// Mints a new access token from the stored refresh token. The refresh
/// token and its timestamp stay untouched.
///
/// # Errors
/// Returns 400 for an unsupported broker, 403 when no refresh token or pin
/// is stored, 502 when FYERS rejects the refresh.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<BrokerSettingsDto>, ApiError> {
    let row = fetch(&state, id).await?;
    require_fyers(&row)?;
    let credentials = app_credentials(&row)?;

    let refresh = row
        .refresh_token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::configuration("no refresh_token stored"))?;
    let pin = row
        .pin
        .clone()
        .ok_or_else(|| ApiError::configuration("pin is not configured for this broker"))?;

    let access = state
        .fyers
        .refresh_access_token(&credentials, &refresh, &pin)
        .await?;

    let updated = state
        .brokers
        .store_refreshed_access_token(id, &access, state.now())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("broker settings {id}")))?;

    info!(broker_id = id, "Stored refreshed access token");
    Ok(Json(dto(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_as_ist_wall_clock() {
        // 02:30 UTC == 08:00 IST.
        let dt: DateTime<Utc> = "2025-07-01T02:30:00Z".parse().unwrap();
        assert_eq!(ist_string(Some(dt)).as_deref(), Some("2025-07-01 08:00:00"));
        assert_eq!(ist_string(None), None);
    }
}
