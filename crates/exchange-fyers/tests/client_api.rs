//! Integration tests for the FYERS client against a mock server.

use optsync_core::FyersConfig;
use optsync_fyers::{AppCredentials, FyersClient, FyersError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> FyersClient {
    let config = FyersConfig {
        api_url: server.uri(),
        auth_url: server.uri(),
    };
    FyersClient::new(&config).expect("client construction")
}

fn credentials() -> AppCredentials {
    AppCredentials {
        client_id: "ABCD1234-100".to_string(),
        secret_key: "topsecret".to_string(),
    }
}

#[tokio::test]
async fn exchange_auth_code_returns_both_tokens() {
    let server = MockServer::start().await;
    let expected_hash = optsync_fyers::app_id_hash("ABCD1234-100", "topsecret");

    Mock::given(method("POST"))
        .and(path("/api/v3/validate-authcode"))
        .and(body_partial_json(json!({
            "grant_type": "authorization_code",
            "appIdHash": expected_hash,
            "code": "AUTH123",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "s": "ok",
            "code": 200,
            "access_token": "new-access",
            "refresh_token": "new-refresh",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pair = client_for(&server)
        .exchange_auth_code(&credentials(), "AUTH123")
        .await
        .expect("exchange should succeed");

    assert_eq!(pair.access_token, "new-access");
    assert_eq!(pair.refresh_token, "new-refresh");
}

#[tokio::test]
async fn refresh_returns_new_access_token_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/validate-refresh-token"))
        .and(body_partial_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": "stored-refresh",
            "pin": "4321",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "s": "ok",
            "code": 200,
            "access_token": "rotated-access",
        })))
        .mount(&server)
        .await;

    let access = client_for(&server)
        .refresh_access_token(&credentials(), "stored-refresh", "4321")
        .await
        .expect("refresh should succeed");

    assert_eq!(access, "rotated-access");
}

#[tokio::test]
async fn broker_rejection_surfaces_upstream_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/validate-refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "s": "error",
            "code": 401,
            "message": "invalid refresh token",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .refresh_access_token(&credentials(), "stale", "4321")
        .await
        .expect_err("refresh should fail");

    match err {
        FyersError::Api { status_code, message } => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "invalid refresh token");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_status_carries_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/validate-authcode"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .exchange_auth_code(&credentials(), "AUTH123")
        .await
        .expect_err("exchange should fail");

    match err {
        FyersError::Api { status_code, message } => {
            assert_eq!(status_code, 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn quote_sends_auth_header_and_extracts_ltp() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/quotes"))
        .and(query_param("symbols", "NSE:NIFTY50-INDEX"))
        .and(header("Authorization", "ABCD1234-100:stored-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "s": "ok",
            "d": [{"n": "NSE:NIFTY50-INDEX", "v": {"lp": 24512.35}}],
        })))
        .mount(&server)
        .await;

    let spot = client_for(&server)
        .quote("stored-access", "ABCD1234-100", "NSE:NIFTY50-INDEX")
        .await
        .expect("quote should succeed");

    assert_eq!(spot, 24_512.35);
}

#[tokio::test]
async fn option_chain_failure_status_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/options-chain-v3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "s": "error",
            "message": "invalid symbol",
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .option_chain("stored-access", "ABCD1234-100", "BOGUS", None, 10)
        .await
        .expect_err("chain should fail");

    match err {
        FyersError::Api { message, .. } => assert_eq!(message, "invalid symbol"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn option_chain_parses_rows_and_expiries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/options-chain-v3"))
        .and(query_param("symbol", "NSE:NIFTY50-INDEX"))
        .and(query_param("strikecount", "2"))
        .and(query_param("timestamp", "1751524200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "s": "ok",
            "data": {
                "optionsChain": [
                    {"symbol": "NSE:NIFTY2570324500CE", "strike_price": 24500,
                     "option_type": "CE", "ltp": 120.5, "oi": 5000, "iv": 13.8, "ch": 2.5},
                    {"symbol": "NSE:NIFTY2570324500PE", "strike_price": 24500,
                     "option_type": "PE", "ltp": 98.0, "oi": 4200, "iv": 14.6, "ch": -1.0}
                ],
                "expiryData": [{"date": "03-07-2025", "expiry": 1751524200}]
            },
        })))
        .mount(&server)
        .await;

    let chain = client_for(&server)
        .option_chain(
            "stored-access",
            "ABCD1234-100",
            "NSE:NIFTY50-INDEX",
            Some(1_751_524_200),
            2,
        )
        .await
        .expect("chain should succeed");

    assert_eq!(chain.options_chain.len(), 2);
    assert_eq!(chain.options_chain[1].option_type, "PE");
    assert_eq!(chain.expiry_data.len(), 1);
}
