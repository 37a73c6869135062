//! HTTP client construction and shared request plumbing.

use std::time::Duration;

use optsync_core::FyersConfig;
use serde::de::DeserializeOwned;

use crate::error::FyersError;

/// App-level credentials from the broker settings row.
#[derive(Debug, Clone)]
pub struct AppCredentials {
    /// FYERS app client id (e.g. `ABCD1234-100`).
    pub client_id: String,
    /// FYERS app secret key.
    pub secret_key: String,
}

/// Thin wrapper around `reqwest::Client` bound to the FYERS base URLs.
///
/// Base URLs come from configuration so tests can point the client at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct FyersClient {
    http: reqwest::Client,
    api_url: String,
    auth_url: String,
}

impl FyersClient {
    /// Builds a client with a 10-second request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &FyersConfig) -> Result<Self, FyersError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FyersError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn auth_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.auth_url)
    }

    pub(crate) fn api_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    /// POSTs a JSON body to a token endpoint and decodes the response,
    /// surfacing non-200 bodies verbatim.
    pub(crate) async fn post_auth<B, R>(&self, path: &str, body: &B) -> Result<R, FyersError>
    where
        B: serde::Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.auth_endpoint(path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FyersError::api(status.as_u16(), message));
        }

        let parsed = response
            .json::<R>()
            .await
            .map_err(|e| FyersError::Decode(e.to_string()))?;
        Ok(parsed)
    }

    /// GETs a market-data endpoint with the `client_id:access_token`
    /// authorization header FYERS expects.
    pub(crate) async fn get_data<R>(
        &self,
        path: &str,
        access_token: &str,
        client_id: &str,
        query: &[(&str, String)],
    ) -> Result<R, FyersError>
    where
        R: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.api_endpoint(path))
            .header("Authorization", format!("{client_id}:{access_token}"))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FyersError::api(status.as_u16(), message));
        }

        let parsed = response
            .json::<R>()
            .await
            .map_err(|e| FyersError::Decode(e.to_string()))?;
        Ok(parsed)
    }
}
