// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorization gate: header extraction, token verification and
//! permission check run in sequence, stopping at the first failure.

use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderMap;

use super::header::bearer_token;
use super::permissions::check_permission;
use super::verifier::TokenVerifier;
use super::{AuthError, Claims};
use crate::config::{AuthConfig, ConfigError};

/// Guard run before every protected operation.
///
/// Cheap to clone; clones share the verifier.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<TokenVerifier>,
}

impl AuthGate {
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_verifier(TokenVerifier::new(config)?))
    }

    pub fn from_verifier(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authorize a request for `permission`, returning the verified claims.
    pub async fn authorize(&self, permission: &str, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let result = self.run(permission, headers).await;
        match &result {
            Ok(claims) => tracing::debug!(
                permission,
                sub = claims.sub.as_deref().unwrap_or_default(),
                "authorization granted"
            ),
            Err(err) => tracing::info!(
                permission,
                code = err.error_code(),
                status = err.status_code().as_u16(),
                "authorization rejected"
            ),
        }
        result
    }

    /// Run `operation` with the verified claims, only if authorized.
    ///
    /// The operation is invoked at most once and never on failure.
    pub async fn guard<F, Fut, T>(
        &self,
        permission: &str,
        headers: &HeaderMap,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(permission, headers).await?;
        Ok(operation(claims).await)
    }

    async fn run(&self, permission: &str, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.verifier.verify(token).await?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }
}
