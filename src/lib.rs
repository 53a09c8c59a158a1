// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop Server - authorization gate for the drink menu API
//!
//! Verifies identity-provider access tokens against the published JWKS and
//! checks the `permissions` claim before a protected operation runs.
//!
//! ## Modules
//!
//! - `api` - Operational HTTP endpoints and router assembly (Axum)
//! - `auth` - Token extraction, verification and permission checks
//! - `config` - Environment-driven configuration
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
