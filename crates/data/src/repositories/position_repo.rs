//! Option position repository.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{NewPosition, Position, PositionPatch};

const COLUMNS: &str = r"
    id, user_id, symbol, strike, expiry, option_type, action, quantity,
    entry_price, current_price, lot_size, trade_date, created_at, updated_at
";

/// Repository for `positions` rows.
#[derive(Debug, Clone)]
pub struct PositionRepository {
    pool: PgPool,
}

impl PositionRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all positions for a user, oldest first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: i64) -> Result<Vec<Position>> {
        let rows = sqlx::query_as::<_, Position>(&format!(
            "SELECT {COLUMNS} FROM positions WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Gets a position by id.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: i64) -> Result<Option<Position>> {
        let row = sqlx::query_as::<_, Position>(&format!(
            "SELECT {COLUMNS} FROM positions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a new position and returns it.
    ///
    /// # Errors
    /// Returns an error if the database insertion fails.
    pub async fn create(
        &self,
        user_id: i64,
        new: NewPosition,
        now: DateTime<Utc>,
    ) -> Result<Position> {
        let row = sqlx::query_as::<_, Position>(&format!(
            "INSERT INTO positions
                (user_id, symbol, strike, expiry, option_type, action,
                 quantity, entry_price, current_price, lot_size,
                 trade_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11, $11)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&new.symbol)
        .bind(new.strike)
        .bind(&new.expiry)
        .bind(&new.option_type)
        .bind(&new.action)
        .bind(new.quantity)
        .bind(new.entry_price)
        .bind(new.current_price)
        .bind(new.lot_size)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Applies price/quantity edits in place. Returns `None` for an
    /// unknown id.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: i64,
        patch: PositionPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Position>> {
        let row = sqlx::query_as::<_, Position>(&format!(
            "UPDATE positions
             SET quantity = COALESCE($2, quantity),
                 entry_price = COALESCE($3, entry_price),
                 current_price = COALESCE($4, current_price),
                 updated_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.quantity)
        .bind(patch.entry_price)
        .bind(patch.current_price)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Deletes a position. Returns false for an unknown id.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every position for a user. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn clear(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM positions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, removed = result.rows_affected(), "Cleared positions");
        Ok(result.rows_affected())
    }
}
