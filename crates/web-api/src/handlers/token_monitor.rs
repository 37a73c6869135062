//! Token expiry endpoints backing the bell notification UI.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use optsync_token_monitor::{derive_notifications, token_status, TokenNotification, TokenStatus};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::{AppState, DEFAULT_USER_ID};

#[derive(Debug, Serialize)]
pub struct TokenStatusResponse {
    pub brokers: Vec<TokenStatus>,
    pub total_brokers: usize,
    pub expired_access_tokens: usize,
    pub expired_refresh_tokens: usize,
}

/// Token expiry status for every credential row that holds an access token.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TokenStatusResponse>, ApiError> {
    let now = state.now();
    let rows = state.brokers.list(DEFAULT_USER_ID).await?;

    let brokers: Vec<TokenStatus> = rows
        .iter()
        .filter(|row| row.has_access_token())
        .map(|row| token_status(row, now))
        .collect();

    let expired_access_tokens = brokers.iter().filter(|s| s.access_token_expired).count();
    let expired_refresh_tokens = brokers.iter().filter(|s| s.refresh_token_expired).count();

    Ok(Json(TokenStatusResponse {
        total_brokers: brokers.len(),
        expired_access_tokens,
        expired_refresh_tokens,
        brokers,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<TokenNotification>,
    pub count: usize,
}

/// Flattened notification list for the bell dropdown. Rows without any
/// access token are included so the UI can prompt for initial setup.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let now = state.now();
    let rows = state.brokers.list(DEFAULT_USER_ID).await?;

    let notifications: Vec<TokenNotification> = rows
        .iter()
        .flat_map(|row| derive_notifications(row, now))
        .collect();

    Ok(Json(NotificationsResponse {
        count: notifications.len(),
        notifications,
    }))
}
