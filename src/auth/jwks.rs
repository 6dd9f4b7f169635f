// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Freshness
//!
//! - Keys are cached for a bounded TTL (5 minutes by default)
//! - An expired cache is never served: if the refresh fails, the lookup
//!   fails and the request is denied
//! - A `kid` missing from the cached set forces one early refresh, at most
//!   once per minimum refresh interval, so rotated keys are picked up
//! - Concurrent callers share a single in-flight fetch, and a failed fetch
//!   is not retried before the minimum refresh interval has passed
//!
//! Only RSA keys usable for RS256 signatures are ever returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::error::AuthFailure;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default timeout for a JWKS fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum spacing between refreshes forced by an unknown `kid`.
const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Path of the key set on the identity service.
const JWKS_PATH: &str = "/v1/jwks";

/// Build the JWKS endpoint URL from the identity service base URL.
pub fn jwks_endpoint(identity_url: &str) -> String {
    format!("{}{}", identity_url.trim_end_matches('/'), JWKS_PATH)
}

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// JWKS manager with caching.
///
/// Fetches are single-flight: callers that find the cache stale queue on
/// the refresh gate and re-check the cache once they hold it, so a burst
/// of requests costs at most one fetch.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL
    jwks_url: String,
    /// Cache TTL
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// Held across a fetch; records when the last failed fetch happened.
    refresh_gate: Arc<Mutex<Option<Instant>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a new JWKS manager.
    ///
    /// # Arguments
    /// - `jwks_url`: The JWKS endpoint URL (see [`jwks_endpoint`])
    /// - `timeout`: Upper bound on a single key set fetch
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: Arc::new(RwLock::new(None)),
            refresh_gate: Arc::new(Mutex::new(None)),
            client,
        })
    }

    /// Create with custom cache TTL. A zero TTL disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Spacing between forced refreshes, and between retries after a
    /// failed fetch.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Cached key set, if it is younger than `max_age`.
    async fn cached(&self, max_age: Duration) -> Option<(JwkSet, Instant)> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < max_age)
            .map(|entry| (entry.jwks.clone(), entry.fetched_at))
    }

    /// Fetch JWKS (with caching).
    async fn get_jwks(&self) -> Result<(JwkSet, Instant), AuthFailure> {
        if let Some(hit) = self.cached(self.cache_ttl).await {
            return Ok(hit);
        }
        self.refresh_older_than(self.cache_ttl).await
    }

    /// Replace the cache unless another caller refreshed it within `max_age`.
    async fn refresh_older_than(&self, max_age: Duration) -> Result<(JwkSet, Instant), AuthFailure> {
        let mut last_failure = self.refresh_gate.lock().await;

        if let Some(hit) = self.cached(max_age).await {
            return Ok(hit);
        }
        if let Some(failed_at) = *last_failure {
            if failed_at.elapsed() < self.min_refresh_interval {
                return Err(AuthFailure::KeySetUnavailable(
                    "key set fetch failed recently".to_string(),
                ));
            }
        }

        let jwks = match self.fetch_jwks().await {
            Ok(jwks) => jwks,
            Err(e) => {
                *last_failure = Some(Instant::now());
                return Err(e);
            }
        };
        *last_failure = None;

        let fetched_at = Instant::now();
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks: jwks.clone(),
            fetched_at,
        });

        Ok((jwks, fetched_at))
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthFailure> {
        debug!(url = %self.jwks_url, "fetching key set");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthFailure::KeySetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthFailure::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthFailure::KeySetUnavailable(e.to_string()))
    }

    /// Get the RS256 decoding key for a token.
    ///
    /// With a `kid`, the key with that ID is used. Without one, the first
    /// RS256-capable key in the set is used.
    pub async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthFailure> {
        let (jwks, fetched_at) = self.get_jwks().await?;
        if let Some(key) = select_key(&jwks, kid)? {
            return Ok(key);
        }

        // an unknown kid may mean the keys were rotated
        if kid.is_some() && fetched_at.elapsed() >= self.min_refresh_interval {
            debug!(kid = ?kid, "kid not in cached key set, refreshing");
            let (jwks, _) = self.refresh_older_than(self.min_refresh_interval).await?;
            if let Some(key) = select_key(&jwks, kid)? {
                return Ok(key);
            }
        }

        Err(AuthFailure::NoMatchingKey)
    }

    /// Make sure a key set younger than the cache TTL is held, fetching
    /// one if needed.
    pub async fn ensure_fresh(&self) -> Result<(), AuthFailure> {
        self.get_jwks().await.map(|_| ())
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), AuthFailure> {
        self.refresh_older_than(Duration::ZERO).await.map(|_| ())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        self.cached(self.cache_ttl).await.is_some()
    }
}

fn select_key(jwks: &JwkSet, kid: Option<&str>) -> Result<Option<DecodingKey>, AuthFailure> {
    let found = jwks
        .keys
        .iter()
        .filter(|jwk| match kid {
            Some(kid) => jwk.common.key_id.as_deref() == Some(kid),
            None => true,
        })
        .find(|jwk| is_rs256_signing_key(jwk));

    match found {
        Some(jwk) => rsa_decoding_key(jwk).map(Some),
        None => Ok(None),
    }
}

fn is_rs256_signing_key(jwk: &Jwk) -> bool {
    matches!(jwk.algorithm, AlgorithmParameters::RSA(_))
        && matches!(jwk.common.key_algorithm, None | Some(KeyAlgorithm::RS256))
        && !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption))
}

fn rsa_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthFailure> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthFailure::KeySetUnavailable(format!("invalid RSA key: {e}"))),
        _ => Err(AuthFailure::NoMatchingKey),
    }
}
