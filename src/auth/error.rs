// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Callers see three kinds: a malformed header, a failed authentication and
//! a failed authorization. The cause of a failed authentication is kept in
//! [`AuthFailure`] for logging, but every cause is handled the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

/// Why a token failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// The JWKS endpoint could not be reached or returned garbage
    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),
    /// No RS256 key in the key set matches the token
    #[error("no matching key in key set")]
    NoMatchingKey,
    /// Token header names an algorithm other than RS256
    #[error("unsupported signing algorithm {0}")]
    UnsupportedAlgorithm(String),
    #[error("signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not yet valid")]
    NotYetValid,
    #[error("token issuer is invalid")]
    InvalidIssuer,
    #[error("token is malformed")]
    Malformed,
    /// A protected handler ran without a verified claim set
    #[error("request was not authenticated")]
    Unauthenticated,
}

/// Errors returned by the authentication boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("expected authorization header format: Bearer <token>")]
    MalformedHeader,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(#[from] AuthFailure),

    #[error("not enough permissions: {permission} is required")]
    AuthorizationFailed { permission: String },
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedHeader => "malformed_header",
            AuthError::AuthenticationFailed(_) => "authentication_failed",
            AuthError::AuthorizationFailed { .. } => "authorization_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MalformedHeader | AuthError::AuthenticationFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::AuthorizationFailed { .. } => StatusCode::FORBIDDEN,
        }
    }

    /// Message safe to return to the client.
    ///
    /// The failure cause stays in the logs.
    fn public_message(&self) -> String {
        match self {
            AuthError::AuthenticationFailed(_) => "Authentication failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!(error = %self, error_code = self.error_code(), "request rejected");

        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
