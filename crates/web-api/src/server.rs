use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/broker_settings", get(handlers::broker::list))
            .route("/api/broker_settings", post(handlers::broker::create))
            .route("/api/broker_settings/:id", put(handlers::broker::update))
            .route("/api/broker_settings/:id", delete(handlers::broker::delete))
            .route(
                "/api/broker_settings/:id/token",
                post(handlers::broker::exchange_token),
            )
            .route(
                "/api/broker_settings/:id/refresh",
                post(handlers::broker::refresh_token),
            )
            .route(
                "/api/broker_settings/:id/tokens/view",
                get(handlers::broker::view_tokens),
            )
            .route(
                "/api/token-monitor/status",
                get(handlers::token_monitor::status),
            )
            .route(
                "/api/token-monitor/notifications",
                get(handlers::token_monitor::notifications),
            )
            .route("/api/positions", get(handlers::positions::list))
            .route("/api/positions", post(handlers::positions::create))
            .route("/api/positions/payoff", get(handlers::positions::payoff))
            .route("/api/positions/clear", delete(handlers::positions::clear))
            .route("/api/positions/:id", put(handlers::positions::update))
            .route("/api/positions/:id", delete(handlers::positions::delete))
            .route("/api/spot_price", get(handlers::market::spot_price))
            .route("/api/option_chain", post(handlers::market::option_chain))
            .route(
                "/api/option_history/:symbol",
                get(handlers::market::option_history),
            )
            .route("/api/live_data", get(handlers::market::live_data))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
