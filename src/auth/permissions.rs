// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission checks against decoded claims.
//!
//! Permissions are opaque strings such as `get:drinks-detail` or
//! `delete:drinks`, granted by the identity provider in the `permissions`
//! claim.

use super::{AuthError, Claims};

/// Permission required to read the detailed drink representation.
pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
/// Permission required to create drinks.
pub const POST_DRINKS: &str = "post:drinks";
/// Permission required to update drinks.
pub const PATCH_DRINKS: &str = "patch:drinks";
/// Permission required to delete drinks.
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Confirm `required` is present in the claims' permission list.
///
/// An empty `required` string is matched literally like any other; it does
/// not mean "no permission needed".
pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::MissingPermissions);
    }

    if claims.has_permission(required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
