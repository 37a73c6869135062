//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use optsync_core::{AppConfig, Clock, LiveDataCache, SystemClock};
use optsync_data::{BrokerRepository, PositionRepository};
use optsync_fyers::FyersClient;
use parking_lot::Mutex;
use sqlx::PgPool;

/// Single-user development mode: every row is owned by user 0 until
/// authentication exists.
pub const DEFAULT_USER_ID: i64 = 0;

/// Everything the handlers need, built once at startup.
pub struct AppState {
    pub brokers: BrokerRepository,
    pub positions: PositionRepository,
    pub fyers: FyersClient,
    pub live_cache: Mutex<LiveDataCache>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires repositories, broker client, and cache from configuration.
    ///
    /// # Errors
    /// Returns an error if the FYERS client cannot be constructed.
    pub fn new(pool: PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            brokers: BrokerRepository::new(pool.clone()),
            positions: PositionRepository::new(pool),
            fyers: FyersClient::new(&config.fyers)?,
            live_cache: Mutex::new(LiveDataCache::with_defaults()),
            clock: Arc::new(SystemClock),
        })
    }

    /// Current instant from the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }
}
