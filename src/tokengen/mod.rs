// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service token acquisition through the OAuth client-credentials grant.
//!
//! The issued token is returned to the caller, which decides where it goes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::http::{HttpClient, HttpError, Payload};

mod config;
mod error;

pub use config::{CustomerConfig, TokenConfig};
pub use error::TokenError;

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Timeout for a token exchange.
pub const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body of the client-credentials exchange.
///
/// Deliberately not `Debug`: it holds the client secret.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn client_credentials(customer: &'a CustomerConfig) -> Self {
        Self {
            grant_type: CLIENT_CREDENTIALS_GRANT,
            client_id: &customer.client_id,
            client_secret: &customer.client_secret,
        }
    }
}

/// Response body of the client-credentials exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: u64,
}

/// Exchange a tenant's client credentials for an access token.
///
/// # Arguments
/// - `config`: Loaded tenant and endpoint configuration
/// - `tenant`: Tenant name, matched case-insensitively
/// - `environment`: Environment whose token endpoint is used
/// - `cancel`: Aborts the exchange when cancelled
pub async fn generate_token(
    config: &TokenConfig,
    tenant: &str,
    environment: &str,
    cancel: &CancellationToken,
) -> Result<String, TokenError> {
    let customer = config
        .find_customer(tenant)
        .ok_or_else(|| TokenError::UnknownTenant(tenant.to_string()))?;

    let token_url = config
        .token_url(environment)
        .ok_or_else(|| TokenError::UnknownEnvironment(environment.to_string()))?;

    info!(%tenant, %environment, %token_url, "generating token");

    let wrap = |source: HttpError| TokenError::Http {
        tenant: tenant.to_string(),
        environment: environment.to_string(),
        source,
    };

    let client = HttpClient::new(token_url, TOKEN_REQUEST_TIMEOUT).map_err(wrap)?;
    let payload = Payload::json(&TokenRequest::client_credentials(customer)).map_err(wrap)?;

    let response: TokenResponse = client
        .post(cancel, "", None, &payload)
        .await
        .map_err(wrap)?;

    if response.access_token.trim().is_empty() {
        return Err(TokenError::EmptyToken {
            tenant: tenant.to_string(),
            environment: environment.to_string(),
        });
    }

    info!(
        %tenant,
        %environment,
        token_type = %response.token_type,
        expires_in = response.expires_in,
        "token generated"
    );

    Ok(response.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use crate::test_support::{spawn_server, unreachable_url};

    struct TokenServer {
        url: String,
        requests: Arc<Mutex<Vec<Value>>>,
    }

    async fn token_server(status: StatusCode, body: Value) -> TokenServer {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        let router = Router::new().route(
            "/oauth/token",
            post(move |Json(request): Json<Value>| {
                seen.lock().unwrap().push(request);
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let base = spawn_server(router).await;
        TokenServer {
            url: format!("{base}/oauth/token"),
            requests,
        }
    }

    fn config_for(token_url: &str) -> TokenConfig {
        TokenConfig::new(
            HashMap::from([("prod".to_string(), token_url.to_string())]),
            HashMap::from([(
                "acmecorp".to_string(),
                CustomerConfig {
                    client_id: "acme-id".to_string(),
                    client_secret: "acme-secret".to_string(),
                    service_url: "https://story.acme.example.com".to_string(),
                },
            )]),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn returns_issued_token_with_case_insensitive_tenant() {
        let server = token_server(
            StatusCode::OK,
            json!({ "access_token": "abc123", "token_type": "Bearer", "expires_in": 3600 }),
        )
        .await;
        let config = config_for(&server.url);

        let token = generate_token(&config, "AcmeCorp", "prod", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(token, "abc123");

        let requests = server.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            json!({
                "grant_type": "client_credentials",
                "client_id": "acme-id",
                "client_secret": "acme-secret"
            })
        );
    }

    #[tokio::test]
    async fn empty_access_token_is_an_error() {
        let server = token_server(StatusCode::OK, json!({ "access_token": "" })).await;
        let config = config_for(&server.url);

        let err = generate_token(&config, "acmecorp", "prod", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::EmptyToken { .. }));
    }

    #[tokio::test]
    async fn unknown_tenant_makes_no_request() {
        let server = token_server(StatusCode::OK, json!({ "access_token": "abc123" })).await;
        let config = config_for(&server.url);

        let err = generate_token(&config, "Unknown", "prod", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::UnknownTenant(ref name) if name == "Unknown"));
        assert!(server.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_environment_is_an_error() {
        let config = config_for("http://127.0.0.1:1/token");

        let err = generate_token(&config, "acmecorp", "stage", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::UnknownEnvironment(ref env) if env == "stage"));
    }

    #[tokio::test]
    async fn rejected_exchange_keeps_status_kind() {
        let server = token_server(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "invalid_client" }),
        )
        .await;
        let config = config_for(&server.url);

        let err = generate_token(&config, "acmecorp", "prod", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.http_error().and_then(HttpError::status), Some(401));

        let message = err.to_string();
        assert!(message.contains("acmecorp"));
        assert!(message.contains("prod"));
        assert!(!message.contains("acme-secret"));
    }

    #[tokio::test]
    async fn undecodable_response_is_decode_error() {
        let server = token_server(StatusCode::OK, json!({ "access_token": 42 })).await;
        let config = config_for(&server.url);

        let err = generate_token(&config, "acmecorp", "prod", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err.http_error(), Some(HttpError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let config = config_for(&unreachable_url().await);

        let err = generate_token(&config, "acmecorp", "prod", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err.http_error(), Some(HttpError::Transport(_))));
    }
}
