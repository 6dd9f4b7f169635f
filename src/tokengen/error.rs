// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::http::HttpError;

/// Errors from the client-credentials token exchange.
///
/// Messages name the tenant and environment but never the client secret.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("customer {0} not found")]
    UnknownTenant(String),

    #[error("token URL for environment {0} not found")]
    UnknownEnvironment(String),

    #[error("received empty access token for customer {tenant} in environment {environment}")]
    EmptyToken { tenant: String, environment: String },

    #[error("failed to generate token for customer {tenant} in environment {environment}: {source}")]
    Http {
        tenant: String,
        environment: String,
        #[source]
        source: HttpError,
    },
}

impl TokenError {
    /// The underlying HTTP failure, if the exchange itself failed.
    pub fn http_error(&self) -> Option<&HttpError> {
        match self {
            TokenError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}
