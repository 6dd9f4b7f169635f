// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tenant credentials and token endpoints for the client-credentials grant.
//!
//! The configuration file looks like:
//!
//! ```json
//! {
//!   "TokenURLs": { "dev": "https://...", "prod": "https://..." },
//!   "Customers": {
//!     "acmecorp": { "clientID": "...", "clientSecret": "...", "storyUrl": "https://..." }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::config::ConfigError;

/// Credentials of one tenant.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerConfig {
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    /// Service URL the tenant's tokens are used against
    #[serde(rename = "storyUrl", alias = "serviceUrl", default)]
    pub service_url: String,
}

impl std::fmt::Debug for CustomerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("service_url", &self.service_url)
            .finish()
    }
}

#[derive(Deserialize)]
struct RawTokenConfig {
    #[serde(rename = "TokenURLs", default)]
    token_urls: HashMap<String, String>,
    #[serde(rename = "Customers", default)]
    customers: HashMap<String, CustomerConfig>,
}

/// Loaded once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    token_urls: HashMap<String, String>,
    /// Keyed by lowercased tenant name
    customers: HashMap<String, (String, CustomerConfig)>,
}

impl TokenConfig {
    /// Build a config, rejecting tenant names that collide case-insensitively.
    pub fn new(
        token_urls: HashMap<String, String>,
        customers: HashMap<String, CustomerConfig>,
    ) -> Result<Self, ConfigError> {
        let mut by_key: HashMap<String, (String, CustomerConfig)> = HashMap::new();
        for (name, customer) in customers {
            let key = name.to_lowercase();
            if let Some((existing, _)) = by_key.get(&key) {
                return Err(ConfigError::DuplicateTenant {
                    first: existing.clone(),
                    second: name,
                });
            }
            by_key.insert(key, (name, customer));
        }

        Ok(Self {
            token_urls,
            customers: by_key,
        })
    }

    /// Parse the JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawTokenConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        Self::new(raw.token_urls, raw.customers)
    }

    /// Read and parse the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&contents)?;

        info!(
            path = %path.display(),
            customers = config.customers.len(),
            environments = config.token_urls.len(),
            "loaded token configuration"
        );
        Ok(config)
    }

    /// Look up a tenant by name, ignoring case.
    pub fn find_customer(&self, name: &str) -> Option<&CustomerConfig> {
        self.customers
            .get(&name.to_lowercase())
            .map(|(_, customer)| customer)
    }

    /// Token endpoint for an environment. Environment names are exact.
    pub fn token_url(&self, environment: &str) -> Option<&str> {
        self.token_urls.get(environment).map(String::as_str)
    }

    /// Tenant names as written in the configuration, sorted.
    pub fn customer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .customers
            .values()
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "TokenURLs": { "dev": "https://dev.example.com/token", "prod": "https://example.com/token" },
        "Customers": {
            "acmecorp": { "clientID": "acme-id", "clientSecret": "acme-secret", "storyUrl": "https://story.acme.example.com" },
            "Globex": { "clientID": "globex-id", "clientSecret": "globex-secret", "storyUrl": "https://story.globex.example.com" }
        }
    }"#;

    #[test]
    fn lookup_is_case_insensitive() {
        let config = TokenConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.find_customer("AcmeCorp").unwrap().client_id, "acme-id");
        assert_eq!(config.find_customer("globex").unwrap().client_id, "globex-id");
        assert!(config.find_customer("Unknown").is_none());
    }

    #[test]
    fn environment_lookup_is_exact() {
        let config = TokenConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.token_url("prod"), Some("https://example.com/token"));
        assert_eq!(config.token_url("stage"), None);
    }

    #[test]
    fn case_insensitive_collision_is_an_error() {
        let json = r#"{
            "TokenURLs": {},
            "Customers": {
                "acmecorp": { "clientID": "a", "clientSecret": "a" },
                "AcmeCorp": { "clientID": "b", "clientSecret": "b" }
            }
        }"#;
        let err = TokenConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTenant { .. }));
    }

    #[test]
    fn customer_names_keep_original_spelling() {
        let config = TokenConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.customer_names(), vec!["Globex", "acmecorp"]);
    }

    #[test]
    fn debug_redacts_client_secret() {
        let config = TokenConfig::from_json(SAMPLE).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("acme-secret"));
        assert!(rendered.contains("acme-id"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = TokenConfig::load(file.path()).unwrap();
        assert!(config.find_customer("ACMECORP").is_some());
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");
        assert!(matches!(TokenConfig::load(&missing), Err(ConfigError::Io { .. })));

        assert!(matches!(
            TokenConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
