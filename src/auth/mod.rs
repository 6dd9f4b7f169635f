// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication and permission-based authorization.
//!
//! ## Auth Flow
//!
//! 1. Caller sends `Authorization: Bearer <JWT>`
//! 2. Server:
//!    - Fetches the identity service JWKS via HTTPS (cached with a TTL)
//!    - Verifies the RS256 signature, expiry and structure
//!    - Produces a [`ClaimSet`]
//! 3. The route's required permission is checked against the
//!    organization-wide grants in the claim set
//!
//! ## Security
//!
//! - Only RS256 is accepted; the token cannot choose its algorithm
//! - Every failure denies the request (fail-closed)
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod permissions;

pub use claims::{ClaimSet, PermissionsClaim, Userinfo};
pub use context::{parse_bearer, AuthContext};
pub use error::{AuthError, AuthFailure};
pub use extractor::Claims;
pub use jwks::{jwks_endpoint, JwksManager};
pub use permissions::authorize;
