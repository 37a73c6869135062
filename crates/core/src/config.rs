use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub fyers: FyersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FyersConfig {
    /// Base URL for market data endpoints (quotes, option chain, history).
    pub api_url: String,
    /// Base URL for token endpoints (validate-authcode, validate-refresh-token).
    pub auth_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/optsync".to_string(),
                max_connections: 10,
            },
            fyers: FyersConfig::default(),
        }
    }
}

impl Default for FyersConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-t1.fyers.in".to_string(),
            auth_url: "https://api-t1.fyers.in".to_string(),
        }
    }
}
