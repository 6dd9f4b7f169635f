// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified claim set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Claims as they appear in an identity service token.
///
/// Only the verifier deserializes these, and only after the signature
/// check has passed does it turn them into a [`ClaimSet`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenClaims {
    /// Subject (user or client ID)
    pub sub: String,

    /// Issuer
    #[serde(default)]
    pub iss: String,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Organization the token is scoped to
    #[serde(default)]
    pub org: String,

    #[serde(default)]
    pub groups: Vec<String>,

    #[serde(default)]
    pub userinfo: Option<Userinfo>,

    #[serde(default)]
    pub permissions: PermissionsClaim,
}

/// Profile information about the token subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Userinfo {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Permission grants carried by a token.
///
/// `org` holds organization-wide permissions, `units` holds permissions
/// granted within a single organizational unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsClaim {
    #[serde(default)]
    pub org: Vec<String>,
    #[serde(default)]
    pub units: HashMap<String, Vec<String>>,
}

/// The decoded contents of a signature-verified token.
///
/// There is no public constructor: a `ClaimSet` is only produced by
/// [`AuthContext::authenticate`](super::AuthContext::authenticate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
    subject: String,
    issuer: String,
    expires_at: i64,
    issued_at: i64,
    organization: String,
    groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    userinfo: Option<Userinfo>,
    permissions: PermissionsClaim,
}

impl ClaimSet {
    /// Build from claims whose signature has already been verified.
    pub(crate) fn from_verified(claims: TokenClaims) -> Self {
        Self {
            subject: claims.sub,
            issuer: claims.iss,
            expires_at: claims.exp,
            issued_at: claims.iat,
            organization: claims.org,
            groups: claims.groups,
            userinfo: claims.userinfo,
            permissions: claims.permissions,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Token expiration (Unix timestamp).
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn userinfo(&self) -> Option<&Userinfo> {
        self.userinfo.as_ref()
    }

    pub fn permissions(&self) -> &PermissionsClaim {
        &self.permissions
    }

    /// Check if the organization-wide grants contain `permission` exactly.
    pub fn has_permission_in_organization(&self, permission: &str) -> bool {
        self.permissions.org.iter().any(|p| p == permission)
    }

    /// Check if `permission` is granted within `unit`.
    ///
    /// Organization-wide grants apply to every unit.
    pub fn has_permission_in_unit(&self, unit: &str, permission: &str) -> bool {
        if self.has_permission_in_organization(permission) {
            return true;
        }
        self.permissions
            .units
            .get(unit)
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }
}

#[cfg(test)]
pub(crate) fn sample_claims() -> TokenClaims {
    TokenClaims {
        sub: "user_123".to_string(),
        iss: "https://imas.example.com".to_string(),
        exp: 1700003600,
        iat: 1700000000,
        org: "acmecorp".to_string(),
        groups: vec!["editors".to_string()],
        userinfo: None,
        permissions: PermissionsClaim {
            org: vec!["story:read".to_string(), "story:write".to_string()],
            units: HashMap::from([(
                "newsroom".to_string(),
                vec!["story:publish".to_string()],
            )]),
        },
    }
}
