//! Token exchange and refresh flows.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::client::{AppCredentials, FyersClient};
use crate::error::FyersError;

const VALIDATE_AUTHCODE_PATH: &str = "/api/v3/validate-authcode";
const VALIDATE_REFRESH_PATH: &str = "/api/v3/validate-refresh-token";

/// Both tokens returned by a full auth-code exchange.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// `appIdHash` as FYERS defines it: hex-encoded SHA-256 of the app client
/// id concatenated with the secret key.
#[must_use]
pub fn app_id_hash(client_id: &str, secret_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(client_id.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Serialize)]
struct AuthCodeRequest<'a> {
    grant_type: &'static str,
    #[serde(rename = "appIdHash")]
    app_id_hash: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    #[serde(rename = "appIdHash")]
    app_id_hash: &'a str,
    refresh_token: &'a str,
    pin: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    s: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn reject(&self) -> FyersError {
        let status = u16::try_from(self.code.unwrap_or(500)).unwrap_or(500);
        FyersError::api(
            status,
            self.message
                .clone()
                .unwrap_or_else(|| format!("token request failed (s={})", self.s)),
        )
    }
}

impl FyersClient {
    /// Exchanges an auth code for a fresh access/refresh token pair.
    ///
    /// # Errors
    /// Returns an error if the request fails or FYERS rejects the code; the
    /// broker's message is attached either way.
    pub async fn exchange_auth_code(
        &self,
        credentials: &AppCredentials,
        auth_code: &str,
    ) -> Result<TokenPair, FyersError> {
        let hash = app_id_hash(&credentials.client_id, &credentials.secret_key);
        debug!(client_id = %credentials.client_id, "Exchanging auth code");

        let response: TokenResponse = self
            .post_auth(
                VALIDATE_AUTHCODE_PATH,
                &AuthCodeRequest {
                    grant_type: "authorization_code",
                    app_id_hash: &hash,
                    code: auth_code,
                },
            )
            .await?;

        match (response.access_token.as_deref(), response.refresh_token.as_deref()) {
            (Some(access), Some(refresh)) if !access.is_empty() => {
                info!(client_id = %credentials.client_id, "Auth code exchanged");
                Ok(TokenPair {
                    access_token: access.to_string(),
                    refresh_token: refresh.to_string(),
                })
            }
            _ => Err(response.reject()),
        }
    }

    /// Mints a new access token from a stored refresh token and pin. The
    /// refresh token itself is not rotated by this call.
    ///
    /// # Errors
    /// Returns an error if the request fails or FYERS rejects the refresh
    /// token.
    pub async fn refresh_access_token(
        &self,
        credentials: &AppCredentials,
        refresh_token: &str,
        pin: &str,
    ) -> Result<String, FyersError> {
        let hash = app_id_hash(&credentials.client_id, &credentials.secret_key);
        debug!(client_id = %credentials.client_id, "Refreshing access token");

        let response: TokenResponse = self
            .post_auth(
                VALIDATE_REFRESH_PATH,
                &RefreshRequest {
                    grant_type: "refresh_token",
                    app_id_hash: &hash,
                    refresh_token,
                    pin,
                },
            )
            .await?;

        match response.access_token {
            Some(access) if !access.is_empty() => {
                info!(client_id = %credentials.client_id, "Access token refreshed");
                Ok(access)
            }
            _ => Err(response.reject()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_id_hash_matches_sha256_of_concatenation() {
        // sha256("abc") — split across client id and secret key.
        assert_eq!(
            app_id_hash("ab", "c"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
