// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification and authorization for protected routes.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};
use tracing::debug;

use super::claims::TokenClaims;
use super::jwks::JwksManager;
use super::{permissions, AuthError, AuthFailure, ClaimSet};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// The only accepted signing algorithm. Never negotiated from the token.
const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Authentication settings for a set of protected routes.
///
/// Immutable once built and cheap to clone; concurrent requests share it
/// read-only.
#[derive(Clone)]
pub struct AuthContext {
    environment: String,
    jwks: Arc<JwksManager>,
    required_permission: String,
    issuer: Option<String>,
}

impl AuthContext {
    /// Create a new auth context.
    ///
    /// # Arguments
    /// - `environment`: Deployment environment (`dev`, `stage`, `prod`)
    /// - `jwks`: Key set source used to verify signatures
    /// - `required_permission`: Permission [`authorize`](Self::authorize) demands
    pub fn new(
        environment: impl Into<String>,
        jwks: JwksManager,
        required_permission: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            jwks: Arc::new(jwks),
            required_permission: required_permission.into(),
            issuer: None,
        }
    }

    /// Require tokens to carry this `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn required_permission(&self) -> &str {
        &self.required_permission
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify the `Authorization` header value and return its claims.
    pub async fn authenticate(&self, header_value: &str) -> Result<ClaimSet, AuthError> {
        let token = parse_bearer(header_value)?;
        self.verify(token).await.map_err(AuthError::from)
    }

    /// Check the claims against this context's required permission.
    pub fn authorize(&self, claims: &ClaimSet) -> Result<(), AuthError> {
        permissions::authorize(claims, &self.required_permission)
    }

    async fn verify(&self, token: &str) -> Result<ClaimSet, AuthFailure> {
        let header = decode_header(token).map_err(|_| AuthFailure::Malformed)?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(AuthFailure::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let decoding_key = self.jwks.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        if let Some(ref issuer) = self.issuer {
            // set_issuer alone lets a token without `iss` through
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        let token_data = decode::<TokenClaims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthFailure::Expired,
                ErrorKind::InvalidSignature => AuthFailure::InvalidSignature,
                ErrorKind::ImmatureSignature => AuthFailure::NotYetValid,
                ErrorKind::InvalidIssuer => AuthFailure::InvalidIssuer,
                ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => {
                    AuthFailure::InvalidIssuer
                }
                ErrorKind::InvalidAlgorithm => {
                    AuthFailure::UnsupportedAlgorithm(format!("{:?}", header.alg))
                }
                _ => AuthFailure::Malformed,
            }
        })?;

        debug!(
            subject = %token_data.claims.sub,
            organization = %token_data.claims.org,
            environment = %self.environment,
            "token verified"
        );

        Ok(ClaimSet::from_verified(token_data.claims))
    }
}

/// Split `Bearer <token>` and return the token.
///
/// Exactly two whitespace-separated parts are accepted and the scheme is
/// case-sensitive.
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
