// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests: RSA test keys, token minting and local
//! axum servers standing in for the identity service.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Key ID of the trusted test key published by [`jwks_document`].
pub const KEY_A_ID: &str = "test-key-a";

/// Public modulus of key A, base64url encoded.
const KEY_A_MODULUS: &str = "vmtaw6yrobyczs2iZmcdpocTwm8JxoyGabO2CczRJcujRqD0XBZoarz_ESxHmHPPW7SHmQKjEniPUF1yiZULjDfrObZ93QGCke0Ri-SNNicFzSj8gb8Vn1IpzBi7msltzvstPaxwTdbn3HfKVQZVLCrOqnAt1bsnKH6YpXXfHqMKBzq09pAJo4ttcuPBZ5ttDCCinJaN_DTExlMx9PoSdnfM0jQJzg-FMYZVpQLre8c2WuB_6BJLFx89O2pJ5bCQtn4WXK6jZ_ia3TC1eoFAnC3qLiu6zwyG9GxI5juffkhRGgUzm9oZnCRatNpf3wLh5G9oPVIrGNLWBF7vcl-Q9w";

const KEY_A_PEM: &str = include_str!("rsa_key_a.pem");
/// Never published in any key set.
const KEY_B_PEM: &str = include_str!("rsa_key_b.pem");

#[derive(Debug, Clone, Copy)]
pub enum TestKey {
    /// Published in the test key set
    Trusted,
    /// Unknown to the key set
    Untrusted,
}

/// Key set publishing key A.
pub fn jwks_document() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "kid": KEY_A_ID,
            "use": "sig",
            "alg": "RS256",
            "n": KEY_A_MODULUS,
            "e": "AQAB"
        }]
    })
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Claims granting `story:read` and `story:write` in organization `acmecorp`.
pub fn valid_claims() -> Value {
    let now = unix_now();
    json!({
        "sub": "user_123",
        "iss": "https://imas.example.com",
        "iat": now,
        "exp": now + 3600,
        "org": "acmecorp",
        "groups": ["editors"],
        "permissions": {
            "org": ["story:read", "story:write"],
            "units": { "newsroom": ["story:publish"] }
        }
    })
}

/// Sign `claims` with RS256.
pub fn mint_token(key: TestKey, kid: Option<&str>, claims: &Value) -> String {
    let pem = match key {
        TestKey::Trusted => KEY_A_PEM,
        TestKey::Untrusted => KEY_B_PEM,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap()).unwrap()
}

/// Sign `claims` with HS256 using a shared secret.
pub fn mint_hs256_token(kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &EncodingKey::from_secret(b"shared-secret")).unwrap()
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1/jwks")
}

pub struct JwksServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    down: Arc<AtomicBool>,
}

impl JwksServer {
    /// Number of key set fetches served so far.
    pub fn fetches(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// While down, every fetch is answered with 503.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

/// Serve `document` at `/v1/jwks`, counting fetches.
pub async fn spawn_jwks_server(document: Value) -> JwksServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let down = Arc::new(AtomicBool::new(false));
    let counter = hits.clone();
    let outage = down.clone();
    let router = Router::new().route(
        "/v1/jwks",
        get(move || {
            let counter = counter.clone();
            let outage = outage.clone();
            let document = document.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if outage.load(Ordering::SeqCst) {
                    return StatusCode::SERVICE_UNAVAILABLE.into_response();
                }
                Json(document).into_response()
            }
        }),
    );
    let base = spawn_server(router).await;
    JwksServer {
        url: format!("{base}/v1/jwks"),
        hits,
        down,
    }
}
