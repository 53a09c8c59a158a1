// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Bearer-token authorization for the coffee shop API.
//!
//! ## Auth Flow
//!
//! 1. The frontend logs the user in with the identity provider (Auth0)
//! 2. The frontend sends `Authorization: Bearer <access token>`
//! 3. The server:
//!    - extracts the bearer token ([`header`])
//!    - fetches the provider's JWKS and verifies signature, expiry, issuer
//!      and audience ([`verifier`], [`jwks`])
//!    - checks the `permissions` claim for the route's permission
//!      ([`permissions`])
//!
//! [`AuthGate`] runs these steps in order and stops at the first failure.
//! Every failure is an [`AuthError`] rendered as
//! `{"code": ..., "description": ...}`.
//!
//! ## Key Set
//!
//! - The JWKS is fetched on every verification unless a cache TTL is
//!   configured
//! - Fetches time out and are not retried

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod header;
pub mod jwks;
pub mod middleware;
pub mod permissions;
pub mod verifier;

pub use claims::Claims;
pub use error::{AuthError, AuthErrorBody};
pub use extractor::{Authorized, DeleteDrinks, GetDrinksDetail, PatchDrinks, Permission, PostDrinks};
pub use gate::AuthGate;
pub use jwks::JwksManager;
pub use middleware::{require_permission, PermissionGuard};
pub use verifier::TokenVerifier;
