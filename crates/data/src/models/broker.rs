//! Broker credential records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-broker credentials for a user.
///
/// Invariant: a token string and its creation timestamp are set and cleared
/// together. All write paths go through [`crate::BrokerRepository`], which
/// stamps or clears the matching `*_created_at` column whenever a token
/// column changes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrokerSettings {
    pub id: i64,
    pub user_id: i64,
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
    pub access_token_created_at: Option<DateTime<Utc>>,
    pub refresh_token_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BrokerSettings {
    /// True if a non-empty access token is stored.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True if a non-empty refresh token is stored.
    #[must_use]
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Fields accepted when creating a credential row.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBrokerSettings {
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
}

/// Partial update for a credential row.
///
/// Absent fields are left untouched. A present-but-empty string clears the
/// column. Token fields additionally stamp (or clear) their creation
/// timestamps inside the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrokerSettingsPatch {
    pub brokername: Option<String>,
    pub broker_user_id: Option<String>,
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
}

/// Normalizes a patched string: empty input clears the column.
pub(crate) fn normalize(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
