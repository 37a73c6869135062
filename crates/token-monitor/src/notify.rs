//! Notification derivation for the bell dropdown.
//!
//! Consumes the status snapshot and classifies each token independently:
//! error once expired, warning inside the lead window, nothing otherwise.
//! Both token types can fire for the same credential at once.

use chrono::{DateTime, Utc};
use optsync_data::BrokerSettings;
use serde::Serialize;

use crate::status::{token_status, TokenStatus};

/// Warn this many minutes before the access-token boundary.
pub const ACCESS_WARNING_LEAD_MINUTES: i64 = 60;

/// Warn this many days before refresh-token expiry.
pub const REFRESH_WARNING_LEAD_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What the user should do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenAction {
    /// Mint a new access token from the stored refresh token.
    RefreshAccess,
    /// Full re-authorization; the refresh token itself is gone or dying.
    CreateAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// One bell-dropdown entry.
#[derive(Debug, Clone, Serialize)]
pub struct TokenNotification {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub broker_id: i64,
    pub brokername: String,
    pub broker_user_id: String,
    pub message: String,
    pub action: TokenAction,
    pub priority: Priority,
    pub supports_refresh_token: bool,
    pub supports_access_token: bool,
}

/// Derives zero, one, or two notifications for a credential row.
///
/// Rows without any access token still produce an access-token error so the
/// UI can prompt for initial token creation. Refresh-token notifications
/// only apply to rows that hold a refresh token at all.
#[must_use]
pub fn derive_notifications(row: &BrokerSettings, now: DateTime<Utc>) -> Vec<TokenNotification> {
    let status = token_status(row, now);
    let mut notifications = Vec::new();

    if status.access_token_expired {
        notifications.push(notification(
            row,
            &status,
            Severity::Error,
            TokenAction::RefreshAccess,
            format!(
                "{} ({}) access token has expired",
                status.brokername, status.broker_user_id
            ),
        ));
    } else if status.access_token_expires_in_minutes <= ACCESS_WARNING_LEAD_MINUTES {
        notifications.push(notification(
            row,
            &status,
            Severity::Warning,
            TokenAction::RefreshAccess,
            format!(
                "{} ({}) access token expires in {} minutes",
                status.brokername, status.broker_user_id, status.access_token_expires_in_minutes
            ),
        ));
    }

    if status.has_refresh_token {
        if status.refresh_token_expired {
            notifications.push(notification(
                row,
                &status,
                Severity::Error,
                TokenAction::CreateAccess,
                format!(
                    "{} ({}) refresh token has expired - need new access token",
                    status.brokername, status.broker_user_id
                ),
            ));
        } else if status.refresh_token_expires_in_days <= REFRESH_WARNING_LEAD_DAYS {
            notifications.push(notification(
                row,
                &status,
                Severity::Warning,
                TokenAction::CreateAccess,
                format!(
                    "{} ({}) refresh token expires in {} days",
                    status.brokername, status.broker_user_id, status.refresh_token_expires_in_days
                ),
            ));
        }
    }

    notifications
}

fn notification(
    row: &BrokerSettings,
    status: &TokenStatus,
    severity: Severity,
    action: TokenAction,
    message: String,
) -> TokenNotification {
    TokenNotification {
        severity,
        broker_id: status.broker_id,
        brokername: status.brokername.clone(),
        broker_user_id: status.broker_user_id.clone(),
        message,
        action,
        priority: match severity {
            Severity::Error => Priority::High,
            Severity::Warning => Priority::Medium,
        },
        supports_refresh_token: row.has_refresh_token(),
        supports_access_token: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Asia::Kolkata;

    fn ist(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Kolkata
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn row(
        access_created: Option<DateTime<Utc>>,
        refresh_created: Option<DateTime<Utc>>,
    ) -> BrokerSettings {
        BrokerSettings {
            id: 3,
            user_id: 0,
            brokername: "fyers".to_string(),
            broker_user_id: "XA01234".to_string(),
            app_name: None,
            app_source: None,
            clientid: None,
            appkey: None,
            redirect_url: None,
            pin: None,
            useremail: None,
            usermobileno: None,
            pan: None,
            dob: None,
            access_token: access_created.map(|_| "at".to_string()),
            refresh_token: refresh_created.map(|_| "rt".to_string()),
            access_token_created_at: access_created,
            refresh_token_created_at: refresh_created,
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn healthy_tokens_produce_nothing() {
        // 12:00 IST, token minted this morning, refresh 3 days old.
        let now = ist(2025, 7, 1, 12, 0);
        let n = derive_notifications(&row(Some(now - Duration::hours(3)), Some(now - Duration::days(3))), now);
        assert!(n.is_empty());
    }

    #[test]
    fn expired_access_token_is_an_error() {
        // Token from yesterday afternoon, now past today's boundary.
        let now = ist(2025, 7, 1, 9, 0);
        let n = derive_notifications(&row(Some(ist(2025, 6, 30, 15, 0)), None), now);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].severity, Severity::Error);
        assert_eq!(n[0].action, TokenAction::RefreshAccess);
        assert_eq!(n[0].priority, Priority::High);
        assert!(n[0].message.contains("access token has expired"));
    }

    #[test]
    fn missing_access_token_still_prompts() {
        let now = ist(2025, 7, 1, 12, 0);
        let n = derive_notifications(&row(None, None), now);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].severity, Severity::Error);
        assert!(!n[0].supports_refresh_token);
    }

    #[test]
    fn access_warning_inside_sixty_minute_lead() {
        // 07:30 IST, boundary 08:00 -> 30 minutes left; token minted
        // yesterday is not yet expired (pre-boundary), so warning fires.
        let now = ist(2025, 7, 1, 7, 30);
        let n = derive_notifications(&row(Some(ist(2025, 6, 30, 15, 0)), None), now);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].severity, Severity::Warning);
        assert_eq!(n[0].priority, Priority::Medium);
        assert!(n[0].message.contains("expires in 30 minutes"));
    }

    #[test]
    fn refresh_warning_at_two_day_lead() {
        let now = ist(2025, 7, 1, 12, 0);
        // Refresh token 8 days old -> 2 days remaining.
        let n = derive_notifications(
            &row(Some(now - Duration::hours(1)), Some(now - Duration::days(8))),
            now,
        );
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].severity, Severity::Warning);
        assert_eq!(n[0].action, TokenAction::CreateAccess);
        assert!(n[0].message.contains("refresh token expires in 2 days"));
    }

    #[test]
    fn both_tokens_can_fire_simultaneously() {
        // Past the boundary with an 11-day-old refresh token.
        let now = ist(2025, 7, 1, 9, 0);
        let n = derive_notifications(
            &row(Some(ist(2025, 6, 30, 15, 0)), Some(now - Duration::days(11))),
            now,
        );
        assert_eq!(n.len(), 2);
        assert!(n.iter().all(|x| x.severity == Severity::Error));
        assert_eq!(n[1].action, TokenAction::CreateAccess);
        assert!(n[1].message.contains("need new access token"));
    }
}
