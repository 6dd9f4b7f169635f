// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::auth::AuthContext;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthContext,
}

impl AppState {
    pub fn new(auth: AuthContext) -> Self {
        Self { auth }
    }

    /// State verifying against `jwks_url` in the `dev` environment.
    #[cfg(test)]
    pub(crate) fn for_jwks_url(jwks_url: &str, required_permission: &str) -> Self {
        use crate::auth::{jwks::DEFAULT_FETCH_TIMEOUT, JwksManager};

        let jwks = JwksManager::new(jwks_url, DEFAULT_FETCH_TIMEOUT).unwrap();
        Self::new(AuthContext::new("dev", jwks, required_permission))
    }
}
