// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission checks for authorization.
//!
//! Authorization is a pure function of a verified [`ClaimSet`] and the
//! permission a route requires. It must only run after authentication has
//! succeeded; the middleware chain enforces that order.

use super::{AuthError, ClaimSet};

/// Check that `claims` grants `permission` within the token's organization.
pub fn authorize(claims: &ClaimSet, permission: &str) -> Result<(), AuthError> {
    if claims.has_permission_in_organization(permission) {
        Ok(())
    } else {
        Err(AuthError::AuthorizationFailed {
            permission: permission.to_string(),
        })
    }
}

/// Check that `claims` grants `permission` within an organizational unit.
pub fn authorize_in_unit(claims: &ClaimSet, unit: &str, permission: &str) -> Result<(), AuthError> {
    if claims.has_permission_in_unit(unit, permission) {
        Ok(())
    } else {
        Err(AuthError::AuthorizationFailed {
            permission: permission.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::sample_claims;

    fn claims() -> ClaimSet {
        ClaimSet::from_verified(sample_claims())
    }

    #[test]
    fn grants_exact_org_permission() {
        assert!(authorize(&claims(), "story:write").is_ok());
    }

    #[test]
    fn denies_missing_permission_and_names_it() {
        let err = authorize(&claims(), "story:delete").unwrap_err();
        assert_eq!(
            err,
            AuthError::AuthorizationFailed {
                permission: "story:delete".to_string()
            }
        );
    }

    #[test]
    fn denies_empty_permission() {
        assert!(authorize(&claims(), "").is_err());
    }

    #[test]
    fn result_is_stable_across_calls() {
        let claims = claims();
        for _ in 0..3 {
            assert!(authorize(&claims, "story:read").is_ok());
            assert!(authorize(&claims, "story:publish").is_err());
        }
    }

    #[test]
    fn unit_scope_checks() {
        let claims = claims();
        assert!(authorize_in_unit(&claims, "newsroom", "story:publish").is_ok());
        assert!(authorize_in_unit(&claims, "sports", "story:publish").is_err());
    }
}
