// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching.
//!
//! ## Behaviour
//!
//! - By default the key set is fetched on every lookup, so a rotated key is
//!   picked up immediately.
//! - With a cache TTL configured, the set is reused until the TTL elapses. A
//!   `kid` that is not in the cached set forces one refetch before the key
//!   is reported missing.
//! - Fetches have a fixed timeout and are never retried. Any failure is
//!   reported as [`AuthError::KeySetUnavailable`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;
use url::Url;

use super::error::AuthError;
use crate::config::ConfigError;

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// JWKS manager.
///
/// Fetches the identity provider's published keys and turns the one
/// matching a token's `kid` into a [`DecodingKey`].
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS endpoint
    jwks_url: Url,
    /// Cache TTL, `None` disables caching
    cache_ttl: Option<Duration>,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a new JWKS manager with caching disabled.
    pub fn new(jwks_url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            jwks_url,
            cache_ttl: None,
            cache: Arc::new(RwLock::new(None)),
            client,
        })
    }

    /// Enable caching with the given TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    /// Get a decoding key for the given key ID.
    pub async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let Some(ttl) = self.cache_ttl else {
            let jwks = self.fetch_jwks().await?;
            return find_key(&jwks, kid);
        };

        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < ttl {
                    match find_key(&entry.jwks, kid) {
                        Err(AuthError::NoMatchingKey) => {
                            tracing::debug!(kid, "kid not in cached JWKS, refetching");
                        }
                        found => return found,
                    }
                }
            }
        }

        let jwks = self.refresh().await?;
        find_key(&jwks, kid)
    }

    /// Fetch the key set and, if caching is enabled, store it.
    pub async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let jwks = self.fetch_jwks().await?;
        if self.cache_ttl.is_some() {
            let mut cache = self.cache.write().await;
            *cache = Some(CacheEntry {
                jwks: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }
        Ok(jwks)
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let Some(ttl) = self.cache_ttl else {
            return false;
        };
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .is_some_and(|entry| entry.fetched_at.elapsed() < ttl)
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| unavailable(&self.jwks_url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(
                &self.jwks_url,
                format!("HTTP {} from JWKS endpoint", response.status()),
            ));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| unavailable(&self.jwks_url, e.to_string()))
    }
}

fn unavailable(url: &Url, detail: String) -> AuthError {
    tracing::warn!(jwks_url = %url, error = %detail, "JWKS fetch failed");
    AuthError::KeySetUnavailable(detail)
}

/// Find the key with a matching `kid` and build its decoding key.
///
/// When several entries share a `kid`, the last one wins.
fn find_key(jwks: &JwkSet, kid: &str) -> Result<DecodingKey, AuthError> {
    let jwk = jwks
        .keys
        .iter()
        .rfind(|k| k.common.key_id.as_deref() == Some(kid))
        .ok_or(AuthError::NoMatchingKey)?;

    jwk_to_decoding_key(jwk)
}

/// Convert an RSA JWK to a DecodingKey from its modulus and exponent.
///
/// Any other key type cannot verify an RS-family token and is reported as an
/// unparseable token.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| {
                tracing::warn!(error = %e, "JWKS entry has unusable RSA components");
                AuthError::MalformedToken
            }),
        _ => Err(AuthError::MalformedToken),
    }
}
