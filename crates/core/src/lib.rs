pub mod clock;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod live_cache;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, DatabaseConfig, FyersConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use error::DomainError;
pub use live_cache::{LiveDataCache, LiveTick};
