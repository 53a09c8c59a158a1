// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.
//!
//! Every rejection produced by the gate is one of these variants. The
//! response body is always `{"code": ..., "description": ...}` with the
//! variant's status code, so nothing internal leaks past the boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Authorization error type.
///
/// `Display` is the human-readable description sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request
    #[error("Authorization header is expected")]
    AuthorizationHeaderMissing,
    /// Scheme is not `Bearer` (or the header is empty / not text)
    #[error("Authorization header must start with Bearer")]
    InvalidScheme,
    /// Header does not have exactly two parts
    #[error("Token not found")]
    TokenNotFound,
    /// Token header carries no `kid`
    #[error("Authorization malformed.")]
    MissingKeyId,
    /// No key in the key set matches the token's `kid`
    #[error("Unable to find appropriate key")]
    NoMatchingKey,
    /// Signature, algorithm or structure could not be verified
    #[error("Unable to parse authentication token.")]
    MalformedToken,
    /// `exp` is in the past
    #[error("token is expired")]
    TokenExpired,
    /// Audience or issuer mismatch
    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims,
    /// Claims carry no `permissions` field
    #[error("permissions is expected")]
    MissingPermissions,
    /// Required permission not granted
    #[error("You don't have permission to perform this action")]
    Forbidden,
    /// Key set could not be fetched; the detail is logged, never returned
    #[error("Unable to fetch signing keys")]
    KeySetUnavailable(String),
}

/// JSON body returned for every authorization failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthErrorBody {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable description
    pub description: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "authorization_header_missing",
            AuthError::InvalidScheme
            | AuthError::TokenNotFound
            | AuthError::MissingKeyId
            | AuthError::NoMatchingKey
            | AuthError::MalformedToken => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::MissingPermissions => "invalid_payload",
            AuthError::Forbidden => "Forbidden",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// The body this error serializes to.
    pub fn body(&self) -> AuthErrorBody {
        AuthErrorBody {
            code: self.error_code().to_string(),
            description: self.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
