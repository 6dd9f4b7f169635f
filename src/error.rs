// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rejections for requests that match no handler.
//!
//! The body has the same `{error, error_code}` shape as
//! [`AuthError`](crate::auth::AuthError), so clients parse one format.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("no route for {path}")]
    NotFound { path: String },

    #[error("method {method} is not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },
}

#[derive(Serialize)]
struct RoutingErrorBody {
    error: String,
    error_code: &'static str,
}

impl RoutingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RoutingError::NotFound { .. } => "not_found",
            RoutingError::MethodNotAllowed { .. } => "method_not_allowed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RoutingError::NotFound { .. } => StatusCode::NOT_FOUND,
            RoutingError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for RoutingError {
    fn into_response(self) -> Response {
        debug!(error = %self, "unrouted request");

        let body = Json(RoutingErrorBody {
            error: self.to_string(),
            error_code: self.error_code(),
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn not_found_body_matches_auth_rejections() {
        let response = RoutingError::NotFound {
            path: "/v2/stories".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "no route for /v2/stories");
        assert_eq!(body["error_code"], "not_found");
    }

    #[test]
    fn method_not_allowed_maps_to_405() {
        let err = RoutingError::MethodNotAllowed {
            method: "DELETE".to_string(),
            path: "/v1/test".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.error_code(), "method_not_allowed");
        assert_eq!(err.to_string(), "method DELETE is not allowed for /v1/test");
    }
}
