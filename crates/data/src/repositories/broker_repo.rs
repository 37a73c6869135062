//! Broker credential repository.
//!
//! All token writes go through here so the set-together invariant between a
//! token column and its creation timestamp holds on every path: a stored
//! token stamps `*_created_at`, a cleared token clears it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::broker::normalize;
use crate::models::{BrokerSettings, BrokerSettingsPatch, NewBrokerSettings};

const COLUMNS: &str = r"
    id, user_id, brokername, broker_user_id, app_name, app_source,
    clientid, appkey, redirect_url, pin, useremail, usermobileno, pan, dob,
    access_token, refresh_token, access_token_created_at,
    refresh_token_created_at, created_at
";

/// Repository for `broker_settings` rows.
#[derive(Debug, Clone)]
pub struct BrokerRepository {
    pool: PgPool,
}

impl BrokerRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all credential rows for a user.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: i64) -> Result<Vec<BrokerSettings>> {
        let rows = sqlx::query_as::<_, BrokerSettings>(&format!(
            "SELECT {COLUMNS} FROM broker_settings WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Gets a credential row by id.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: i64) -> Result<Option<BrokerSettings>> {
        let row = sqlx::query_as::<_, BrokerSettings>(&format!(
            "SELECT {COLUMNS} FROM broker_settings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// First credential row for a broker name, if any. Used by market-data
    /// routes that need "the" token for a broker.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn find_by_broker(
        &self,
        brokername: &str,
        user_id: i64,
    ) -> Result<Option<BrokerSettings>> {
        let row = sqlx::query_as::<_, BrokerSettings>(&format!(
            "SELECT {COLUMNS} FROM broker_settings
             WHERE lower(brokername) = lower($1) AND user_id = $2
             ORDER BY id LIMIT 1"
        ))
        .bind(brokername)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a new credential row and returns it.
    ///
    /// # Errors
    /// Returns an error if the database insertion fails.
    pub async fn create(&self, user_id: i64, new: NewBrokerSettings) -> Result<BrokerSettings> {
        let row = sqlx::query_as::<_, BrokerSettings>(&format!(
            "INSERT INTO broker_settings
                (user_id, brokername, broker_user_id, app_name, app_source,
                 clientid, appkey, redirect_url, pin, useremail, usermobileno,
                 pan, dob)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&new.brokername)
        .bind(&new.broker_user_id)
        .bind(&new.app_name)
        .bind(&new.app_source)
        .bind(&new.clientid)
        .bind(&new.appkey)
        .bind(&new.redirect_url)
        .bind(&new.pin)
        .bind(&new.useremail)
        .bind(&new.usermobileno)
        .bind(&new.pan)
        .bind(new.dob)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies a partial update. Returns `None` for an unknown id.
    ///
    /// Token fields present in the patch stamp their creation timestamps
    /// with `now`; an emptied token clears its timestamp.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: i64,
        patch: BrokerSettingsPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<BrokerSettings>> {
        let Some(mut row) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(v) = patch.brokername.and_then(normalize) {
            row.brokername = v;
        }
        if let Some(v) = patch.broker_user_id.and_then(normalize) {
            row.broker_user_id = v;
        }
        if let Some(v) = patch.app_name {
            row.app_name = normalize(v);
        }
        if let Some(v) = patch.app_source {
            row.app_source = normalize(v);
        }
        if let Some(v) = patch.clientid {
            row.clientid = normalize(v);
        }
        if let Some(v) = patch.appkey {
            row.appkey = normalize(v);
        }
        if let Some(v) = patch.redirect_url {
            row.redirect_url = normalize(v);
        }
        if let Some(v) = patch.pin {
            row.pin = normalize(v);
        }
        if let Some(v) = patch.useremail {
            row.useremail = normalize(v);
        }
        if let Some(v) = patch.usermobileno {
            row.usermobileno = normalize(v);
        }
        if let Some(v) = patch.pan {
            row.pan = normalize(v);
        }
        if let Some(v) = patch.dob {
            row.dob = Some(v);
        }
        if let Some(v) = patch.access_token {
            row.access_token = normalize(v);
            row.access_token_created_at = row.access_token.as_ref().map(|_| now);
        }
        if let Some(v) = patch.refresh_token {
            row.refresh_token = normalize(v);
            row.refresh_token_created_at = row.refresh_token.as_ref().map(|_| now);
        }

        self.save(&row).await?;
        Ok(Some(row))
    }

    /// Stores both tokens from an auth-code exchange, stamping both
    /// creation timestamps. Returns `None` for an unknown id.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn store_exchanged_tokens(
        &self,
        id: i64,
        access_token: &str,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<BrokerSettings>> {
        let row = sqlx::query_as::<_, BrokerSettings>(&format!(
            "UPDATE broker_settings
             SET access_token = $2, refresh_token = $3,
                 access_token_created_at = $4, refresh_token_created_at = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Stores a refreshed access token. The refresh token and its timestamp
    /// are untouched — only a full re-authorization rotates those.
    /// Returns `None` for an unknown id.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn store_refreshed_access_token(
        &self,
        id: i64,
        access_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<BrokerSettings>> {
        let row = sqlx::query_as::<_, BrokerSettings>(&format!(
            "UPDATE broker_settings
             SET access_token = $2, access_token_created_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(access_token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Deletes a credential row. Returns false for an unknown id.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM broker_settings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn save(&self, row: &BrokerSettings) -> Result<()> {
        sqlx::query(
            r"
            UPDATE broker_settings
            SET brokername = $2, broker_user_id = $3, app_name = $4,
                app_source = $5, clientid = $6, appkey = $7,
                redirect_url = $8, pin = $9, useremail = $10,
                usermobileno = $11, pan = $12, dob = $13,
                access_token = $14, refresh_token = $15,
                access_token_created_at = $16, refresh_token_created_at = $17
            WHERE id = $1
            ",
        )
        .bind(row.id)
        .bind(&row.brokername)
        .bind(&row.broker_user_id)
        .bind(&row.app_name)
        .bind(&row.app_source)
        .bind(&row.clientid)
        .bind(&row.appkey)
        .bind(&row.redirect_url)
        .bind(&row.pin)
        .bind(&row.useremail)
        .bind(&row.usermobileno)
        .bind(&row.pan)
        .bind(row.dob)
        .bind(&row.access_token)
        .bind(&row.refresh_token)
        .bind(row.access_token_created_at)
        .bind(row.refresh_token_created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
