// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction from request headers.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Pull the bearer token out of the `Authorization` header.
///
/// The value must be exactly `<scheme> <token>` (split on whitespace) with a
/// case-insensitive `bearer` scheme. The token is returned as-is; it is not
/// inspected here.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    let mut parts = value.split_whitespace();

    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
        _ => return Err(AuthError::InvalidScheme),
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(AuthError::TokenNotFound),
    }
}
