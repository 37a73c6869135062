use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connection handle for the backend's Postgres database.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects to Postgres with the given pool size.
    ///
    /// # Errors
    /// Returns an error if the database connection cannot be established.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    /// Returns an error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    #[must_use]
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }
}
