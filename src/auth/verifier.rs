// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT verification against the identity provider's JWKS.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::jwks::JwksManager;
use super::{AuthError, Claims};
use crate::config::{check_algorithms, AuthConfig, ConfigError};

/// Verifies access tokens and decodes their claims.
///
/// Holds the JWKS manager and a prebuilt [`Validation`] carrying the
/// accepted algorithms, expected audience and expected issuer. `exp` and
/// `nbf` are checked when present but neither is required.
#[derive(Clone)]
pub struct TokenVerifier {
    jwks: JwksManager,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        check_algorithms(&config.algorithms)?;

        let mut jwks = JwksManager::new(config.jwks_url.clone(), config.fetch_timeout)?;
        if let Some(ttl) = config.key_cache_ttl {
            jwks = jwks.with_cache_ttl(ttl);
        }

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = config.algorithms.clone();
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = config.leeway.as_secs();
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["aud", "iss"]);

        Ok(Self { jwks, validation })
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify `token` and return its claims.
    ///
    /// The unverified header is read first so a token that cannot name its
    /// key is rejected without a network round trip.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let decoding_key = self.jwks.get_decoding_key(&kid).await?;

        let token_data = decode::<Claims>(token, &decoding_key, &self.validation)
            .map_err(|e| map_decode_error(e.kind()))?;

        Ok(token_data.claims)
    }
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::ImmatureSignature => {
            AuthError::InvalidClaims
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
            AuthError::InvalidClaims
        }
        _ => AuthError::MalformedToken,
    }
}
