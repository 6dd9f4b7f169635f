// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for verified claims.
//!
//! ```rust,ignore
//! async fn my_handler(Claims(claims): Claims) -> impl IntoResponse {
//!     // claims is a verified ClaimSet
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, ClaimSet};
use crate::state::AppState;

/// Extractor for the verified claims of the caller.
///
/// Uses the claims stored by the authentication middleware when present,
/// otherwise verifies the `Authorization` header itself.
pub struct Claims(pub ClaimSet);

impl FromRequestParts<AppState> for Claims {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<ClaimSet>().cloned() {
            return Ok(Claims(claims));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MalformedHeader)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        let claims = state.auth.authenticate(header).await?;
        parts.extensions.insert(claims.clone());

        Ok(Claims(claims))
    }
}
