// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization middleware for Axum.
//!
//! Protects a whole router subtree with one permission. On success the
//! verified [`Claims`] are added to the request extensions, where handlers
//! can pick them up with `Extension<Claims>` or [`Authorized`].
//!
//! ```rust,ignore
//! let guard = PermissionGuard::new(gate.clone(), "get:drinks-detail");
//!
//! let app = Router::new()
//!     .route("/drinks-detail", get(drinks_detail))
//!     .route_layer(axum::middleware::from_fn_with_state(guard, require_permission));
//! ```
//!
//! [`Authorized`]: super::Authorized

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthGate, Claims};

/// Middleware state: the gate plus the permission the subtree requires.
#[derive(Clone)]
pub struct PermissionGuard {
    gate: AuthGate,
    permission: Arc<str>,
}

impl PermissionGuard {
    pub fn new(gate: AuthGate, permission: impl Into<Arc<str>>) -> Self {
        Self {
            gate,
            permission: permission.into(),
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }
}

/// Authorization middleware function.
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    match guard.gate.authorize(&guard.permission, request.headers()).await {
        Ok(claims) => {
            request.extensions_mut().insert::<Claims>(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
