// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the typed configuration the
//! server is built from. Configuration is loaded from the environment once
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Identity provider domain | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | `https://{domain}/` |
//! | `AUTH_JWKS_URL` | JWKS endpoint | `https://{domain}/.well-known/jwks.json` |
//! | `AUTH_ALGORITHMS` | Accepted algorithms, comma separated | `RS256` |
//! | `AUTH_FETCH_TIMEOUT_SECS` | JWKS fetch timeout | `5` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance for `exp` | `0` |
//! | `AUTH_KEY_CACHE_TTL_SECS` | Cache the JWKS for this long (unset = fetch per request) | unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;
use url::Url;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
pub const AUTH_ALGORITHMS_ENV: &str = "AUTH_ALGORITHMS";
pub const AUTH_FETCH_TIMEOUT_ENV: &str = "AUTH_FETCH_TIMEOUT_SECS";
pub const AUTH_LEEWAY_ENV: &str = "AUTH_LEEWAY_SECS";
pub const AUTH_KEY_CACHE_TTL_ENV: &str = "AUTH_KEY_CACHE_TTL_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default JWKS fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Configuration errors. These surface at startup, never to clients.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Token verification parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// Identity provider domain (e.g. `coffee.eu.auth0.com`)
    pub domain: String,
    /// JWKS endpoint
    pub jwks_url: Url,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Accepted signing algorithms
    pub algorithms: Vec<Algorithm>,
    /// JWKS fetch timeout
    pub fetch_timeout: Duration,
    /// Clock skew tolerance applied to `exp`
    pub leeway: Duration,
    /// Cache the key set for this long; `None` fetches on every verification
    pub key_cache_ttl: Option<Duration>,
}

impl AuthConfig {
    /// Build a configuration for an Auth0-style tenant.
    ///
    /// The issuer defaults to `https://{domain}/` and the JWKS endpoint to
    /// `https://{domain}/.well-known/jwks.json`.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let base = Url::parse(&format!("https://{domain}/"))?;
        let jwks_url = base.join(".well-known/jwks.json")?;

        Ok(Self {
            issuer: base.to_string(),
            domain,
            jwks_url,
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            leeway: Duration::ZERO,
            key_cache_ttl: None,
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_jwks_url(mut self, jwks_url: Url) -> Self {
        self.jwks_url = jwks_url;
        self
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Enable the key-set cache.
    pub fn with_key_cache_ttl(mut self, ttl: Duration) -> Self {
        self.key_cache_ttl = Some(ttl);
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = lookup(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let audience = lookup(API_AUDIENCE_ENV).ok_or(ConfigError::Missing(API_AUDIENCE_ENV))?;
        let mut config = Self::new(domain, audience)?;

        if let Some(issuer) = lookup(AUTH_ISSUER_ENV) {
            config.issuer = issuer;
        }
        if let Some(url) = lookup(AUTH_JWKS_URL_ENV) {
            config.jwks_url = Url::parse(&url)?;
        }
        if let Some(list) = lookup(AUTH_ALGORITHMS_ENV) {
            config.algorithms = parse_algorithms(&list)?;
        }
        if let Some(secs) = lookup(AUTH_FETCH_TIMEOUT_ENV) {
            config.fetch_timeout = parse_secs(AUTH_FETCH_TIMEOUT_ENV, &secs)?;
        }
        if let Some(secs) = lookup(AUTH_LEEWAY_ENV) {
            config.leeway = parse_secs(AUTH_LEEWAY_ENV, &secs)?;
        }
        if let Some(secs) = lookup(AUTH_KEY_CACHE_TTL_ENV) {
            config.key_cache_ttl = Some(parse_secs(AUTH_KEY_CACHE_TTL_ENV, &secs)?);
        }

        Ok(config)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub json_logs: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                reason: format!("{e}"),
            })?;

        let json_logs = lookup(LOG_FORMAT_ENV).is_some_and(|f| f.eq_ignore_ascii_case("json"));

        Ok(Self { addr, json_logs })
    }
}

fn parse_algorithms(list: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Algorithm>().map_err(|_| ConfigError::Invalid {
                name: AUTH_ALGORITHMS_ENV,
                reason: format!("unknown algorithm {s:?}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    check_algorithms(&algorithms)?;
    Ok(algorithms)
}

/// Keys are only ever built from RSA components, so only the RS and PS
/// families can verify anything.
pub(crate) fn check_algorithms(algorithms: &[Algorithm]) -> Result<(), ConfigError> {
    if algorithms.is_empty() {
        return Err(ConfigError::Invalid {
            name: AUTH_ALGORITHMS_ENV,
            reason: "no algorithms listed".to_string(),
        });
    }
    if let Some(alg) = algorithms.iter().find(|alg| !is_rsa_family(**alg)) {
        return Err(ConfigError::Invalid {
            name: AUTH_ALGORITHMS_ENV,
            reason: format!("{alg:?} cannot be verified with RSA keys"),
        });
    }
    Ok(())
}

fn is_rsa_family(alg: Algorithm) -> bool {
    matches!(
        alg,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::Invalid {
            name,
            reason: format!("{e}"),
        })
}
