// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Publisher Gateway - Bearer Token Authentication & Token Acquisition
//!
//! ## Modules
//!
//! - `auth` - Bearer token verification (RS256 via JWKS) and permission checks
//! - `http` - Minimal JSON HTTP client with classified errors
//! - `tokengen` - Client-credentials token acquisition per tenant
//! - `api` - HTTP routes (Axum) wiring the auth middleware chain

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod state;
pub mod tokengen;

#[cfg(test)]
pub(crate) mod test_support;
