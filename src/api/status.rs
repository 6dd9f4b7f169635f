// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use serde::Serialize;

use crate::auth::Claims;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Public status route.
pub async fn test() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
        subject: None,
        organization: None,
    })
}

/// Status route behind authentication and authorization.
pub async fn test_auth(Claims(claims): Claims) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
        subject: Some(claims.subject().to_string()),
        organization: Some(claims.organization().to_string()),
    })
}
