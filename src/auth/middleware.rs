// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Protected routes run [`authenticate`] then [`authorize`]. Route layers
//! wrap from the outside in, so `authenticate` is added last:
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/testauth", get(handler))
//!     .route_layer(from_fn_with_state(state.clone(), authorize))
//!     .route_layer(from_fn_with_state(state.clone(), authenticate));
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthFailure, ClaimSet};
use crate::state::AppState;

/// Verify the bearer token and store the [`ClaimSet`] in request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // a missing or non-UTF-8 header is just a malformed one
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.auth.authenticate(header).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Check the verified claims against the route's required permission.
///
/// Rejects the request if [`authenticate`] did not run first.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(claims) = request.extensions().get::<ClaimSet>() else {
        return AuthError::from(AuthFailure::Unauthenticated).into_response();
    };

    if let Err(e) = state.auth.authorize(claims) {
        return e.into_response();
    }

    next.run(request).await
}
