// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for permission-gated handlers.
//!
//! A handler declares the permission it needs through a marker type and
//! receives the verified claims:
//!
//! ```rust,ignore
//! async fn create_drink(
//!     Authorized(claims, _): Authorized<PostDrinks>,
//!     Json(body): Json<NewDrink>,
//! ) -> impl IntoResponse {
//!     // claims.permissions contains "post:drinks"
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::permissions::{
    check_permission, DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS,
};
use super::{AuthError, AuthGate, Claims};

/// A permission string known at compile time.
pub trait Permission {
    const NAME: &'static str;
}

/// `get:drinks-detail`
pub struct GetDrinksDetail;
/// `post:drinks`
pub struct PostDrinks;
/// `patch:drinks`
pub struct PatchDrinks;
/// `delete:drinks`
pub struct DeleteDrinks;

impl Permission for GetDrinksDetail {
    const NAME: &'static str = GET_DRINKS_DETAIL;
}

impl Permission for PostDrinks {
    const NAME: &'static str = POST_DRINKS;
}

impl Permission for PatchDrinks {
    const NAME: &'static str = PATCH_DRINKS;
}

impl Permission for DeleteDrinks {
    const NAME: &'static str = DELETE_DRINKS;
}

/// Extractor yielding claims that carry permission `P`.
///
/// If [`require_permission`](super::middleware::require_permission) already
/// verified the token, the claims in the request extensions are reused and
/// only the permission is checked again.
pub struct Authorized<P>(pub Claims, pub PhantomData<fn() -> P>);

impl<P> Authorized<P> {
    pub fn into_claims(self) -> Claims {
        self.0
    }
}

impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    P: Permission,
    AuthGate: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            check_permission(P::NAME, claims)?;
            return Ok(Authorized(claims.clone(), PhantomData));
        }

        let gate = AuthGate::from_ref(state);
        let claims = gate.authorize(P::NAME, &parts.headers).await?;
        Ok(Authorized(claims, PhantomData))
    }
}
