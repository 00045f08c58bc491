// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Cache Policy
//!
//! - Keys are cached by `kid` with no TTL and no eviction. Signing keys are
//!   long-lived and a miss triggers a re-fetch, so a rotated key heals on the
//!   first request that carries it.
//! - At most one fetch is outstanding at a time. Requests that miss while a
//!   fetch is running wait for it and share its outcome instead of fetching
//!   again.
//! - A fetched set is parsed completely before it touches the cache. A timed
//!   out or failed fetch leaves the cache exactly as it was.
//!
//! ## Usage
//!
//! Build one [`KeyResolver`] per process in `main.rs`, wrap it in an `Arc`
//! and hand it to the [`TokenVerifier`](super::TokenVerifier).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};

use super::error::KeyResolutionError;

/// Default timeout for a single key-set fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the key set comes from.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    /// Fetch the complete key set.
    async fn fetch(&self) -> Result<JwkSet, KeyResolutionError>;
}

/// Key set served over HTTP(S) by the token issuer.
pub struct HttpKeySetSource {
    /// JWKS URL (e.g. `https://tenant.auth0.com/.well-known/jwks.json`)
    jwks_url: String,
    /// HTTP client with the fetch timeout applied
    client: reqwest::Client,
}

impl HttpKeySetSource {
    /// Create a source for the given JWKS URL.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, KeyResolutionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KeyResolutionError::Fetch(e.to_string()))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            client,
        })
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }
}

fn map_transport_error(e: reqwest::Error) -> KeyResolutionError {
    if e.is_timeout() {
        KeyResolutionError::Timeout
    } else {
        KeyResolutionError::Fetch(e.to_string())
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self) -> Result<JwkSet, KeyResolutionError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(KeyResolutionError::HttpStatus(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;

        serde_json::from_slice(&body).map_err(|e| KeyResolutionError::MalformedKeySet(e.to_string()))
    }
}

/// Resolves token key identifiers to verification keys.
pub struct KeyResolver {
    /// Remote key set
    source: Arc<dyn KeySetSource>,
    /// `kid` → verification key
    keys: RwLock<HashMap<String, Arc<DecodingKey>>>,
    /// Held for the duration of a fetch; stores the last fetch failure
    fetch: Mutex<Option<KeyResolutionError>>,
    /// Number of completed fetch attempts
    attempts: AtomicU64,
}

impl KeyResolver {
    /// Create a resolver with an empty cache.
    pub fn new(source: Arc<dyn KeySetSource>) -> Self {
        Self {
            source,
            keys: RwLock::new(HashMap::new()),
            fetch: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Resolve a key identifier, fetching the key set on a cache miss.
    pub async fn resolve(&self, kid: &str) -> Result<Arc<DecodingKey>, KeyResolutionError> {
        let observed = self.attempts.load(Ordering::Acquire);

        if let Some(key) = self.cached(kid).await {
            return Ok(key);
        }

        let mut last_failure = self.fetch.lock().await;

        if let Some(key) = self.cached(kid).await {
            return Ok(key);
        }

        if self.attempts.load(Ordering::Acquire) != observed {
            // A fetch finished while we were waiting for the lock.
            return Err(match &*last_failure {
                Some(err) => err.clone(),
                None => KeyResolutionError::NoMatchingKey(kid.to_string()),
            });
        }

        tracing::debug!(kid, "Signing key not cached, fetching key set");
        let outcome = self.fetch_and_merge().await;
        *last_failure = outcome.as_ref().err().cloned();
        self.attempts.fetch_add(1, Ordering::Release);
        outcome?;

        self.cached(kid)
            .await
            .ok_or_else(|| KeyResolutionError::NoMatchingKey(kid.to_string()))
    }

    /// Fetch the key set (startup warm-up and readiness check).
    ///
    /// Callers that queued behind a fetch which completed meanwhile share its
    /// outcome instead of fetching again.
    pub async fn refresh(&self) -> Result<usize, KeyResolutionError> {
        let observed = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.fetch.lock().await;

        if self.attempts.load(Ordering::Acquire) != observed {
            return match &*last_failure {
                Some(err) => Err(err.clone()),
                None => Ok(self.cached_key_count().await),
            };
        }

        let outcome = self.fetch_and_merge().await;
        *last_failure = outcome.as_ref().err().cloned();
        self.attempts.fetch_add(1, Ordering::Release);
        outcome
    }

    /// Number of keys currently cached.
    pub async fn cached_key_count(&self) -> usize {
        self.keys.read().await.len()
    }

    /// Check if any key is cached.
    pub async fn is_cached(&self) -> bool {
        self.cached_key_count().await > 0
    }

    async fn cached(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        self.keys.read().await.get(kid).cloned()
    }

    /// Fetch the set, parse every entry, then merge into the cache.
    async fn fetch_and_merge(&self) -> Result<usize, KeyResolutionError> {
        let jwks = match self.source.fetch().await {
            Ok(jwks) => jwks,
            Err(e) => {
                tracing::warn!(error = %e, "Key set fetch failed");
                return Err(e);
            }
        };

        let mut parsed = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.as_deref() else {
                tracing::debug!("Skipping key set entry without kid");
                continue;
            };
            match jwk_to_decoding_key(jwk) {
                Ok(key) => {
                    parsed.insert(kid.to_string(), Arc::new(key));
                }
                Err(e) => tracing::warn!(kid, error = %e, "Skipping unusable key set entry"),
            }
        }

        if parsed.is_empty() {
            return Err(KeyResolutionError::MalformedKeySet(
                "no usable signing keys".to_string(),
            ));
        }

        let count = parsed.len();
        self.keys.write().await.extend(parsed);
        tracing::info!(keys = count, "Key set refreshed");
        Ok(count)
    }
}

/// Convert a JWK to a DecodingKey. Symmetric keys are never accepted.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, KeyResolutionError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| KeyResolutionError::MalformedKeySet(format!("invalid RSA key: {e}"))),
        AlgorithmParameters::EllipticCurve(ec) => DecodingKey::from_ec_components(&ec.x, &ec.y)
            .map_err(|e| KeyResolutionError::MalformedKeySet(format!("invalid EC key: {e}"))),
        AlgorithmParameters::OctetKeyPair(okp) => DecodingKey::from_ed_components(&okp.x)
            .map_err(|e| KeyResolutionError::MalformedKeySet(format!("invalid OKP key: {e}"))),
        _ => Err(KeyResolutionError::MalformedKeySet(
            "unsupported key type".to_string(),
        )),
    }
}
