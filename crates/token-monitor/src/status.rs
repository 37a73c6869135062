//! Token status snapshots.

use chrono::{DateTime, Utc};
use optsync_data::BrokerSettings;
use serde::Serialize;

use crate::expiry;

/// Point-in-time view of a credential row's token health.
///
/// This is the sole read contract other components (the notification
/// derivation, the status endpoint) depend on. Derived purely from the row
/// plus `now`; no side effects.
#[derive(Debug, Clone, Serialize)]
pub struct TokenStatus {
    pub broker_id: i64,
    pub brokername: String,
    pub broker_user_id: String,
    pub access_token_expired: bool,
    pub access_token_expires_in_minutes: i64,
    pub refresh_token_expired: bool,
    pub refresh_token_expires_in_days: i64,
    pub has_refresh_token: bool,
}

/// Builds the status snapshot for one credential row.
#[must_use]
pub fn token_status(row: &BrokerSettings, now: DateTime<Utc>) -> TokenStatus {
    TokenStatus {
        broker_id: row.id,
        brokername: row.brokername.clone(),
        broker_user_id: row.broker_user_id.clone(),
        access_token_expired: expiry::is_access_token_expired(row.access_token_created_at, now),
        access_token_expires_in_minutes: expiry::access_token_minutes_remaining(now),
        refresh_token_expired: expiry::is_refresh_token_expired(
            row.refresh_token.as_deref(),
            row.refresh_token_created_at,
            now,
        ),
        refresh_token_expires_in_days: expiry::refresh_token_days_remaining(
            row.refresh_token_created_at,
            now,
        ),
        has_refresh_token: row.has_refresh_token(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(
        access_created: Option<DateTime<Utc>>,
        refresh: Option<&str>,
        refresh_created: Option<DateTime<Utc>>,
    ) -> BrokerSettings {
        BrokerSettings {
            id: 7,
            user_id: 0,
            brokername: "fyers".to_string(),
            broker_user_id: "XA01234".to_string(),
            app_name: None,
            app_source: None,
            clientid: Some("ABCD-100".to_string()),
            appkey: Some("secret".to_string()),
            redirect_url: None,
            pin: Some("4321".to_string()),
            useremail: None,
            usermobileno: None,
            pan: None,
            dob: None,
            access_token: access_created.map(|_| "at".to_string()),
            refresh_token: refresh.map(str::to_string),
            access_token_created_at: access_created,
            refresh_token_created_at: refresh_created,
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn snapshot_reflects_fresh_tokens() {
        let now: DateTime<Utc> = "2025-07-01T05:00:00Z".parse().unwrap(); // 10:30 IST
        let status = token_status(
            &row(Some(now - Duration::hours(1)), Some("rt"), Some(now - Duration::days(3))),
            now,
        );
        assert!(!status.access_token_expired);
        assert!(!status.refresh_token_expired);
        assert!(status.has_refresh_token);
        assert_eq!(status.refresh_token_expires_in_days, 7);
        // 10:30 IST -> 21h30m to tomorrow 08:00.
        assert_eq!(status.access_token_expires_in_minutes, 21 * 60 + 30);
    }

    #[test]
    fn snapshot_with_no_tokens_reads_fully_expired() {
        let now: DateTime<Utc> = "2025-07-01T05:00:00Z".parse().unwrap();
        let status = token_status(&row(None, None, None), now);
        assert!(status.access_token_expired);
        assert!(status.refresh_token_expired);
        assert!(!status.has_refresh_token);
        assert_eq!(status.refresh_token_expires_in_days, 0);
    }
}
