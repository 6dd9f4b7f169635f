// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and never
//! mutated afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENV` | Deployment environment (`dev`, `stage`, `prod`) | `dev` |
//! | `IMAS_URL` | Identity service base URL; JWKS is read from `/v1/jwks` | Required unless `JWKS_URL` is set |
//! | `JWKS_URL` | Full JWKS endpoint, overrides `IMAS_URL` | - |
//! | `JWT_ISSUER` | Expected JWT issuer claim | Optional |
//! | `REQUIRED_PERMISSION` | Permission protected routes require | Required |
//! | `JWKS_CACHE_TTL_SECS` | Key set cache lifetime | `300` |
//! | `JWKS_TIMEOUT_SECS` | Key set fetch timeout | `10` |
//! | `TOKEN_CONFIG_PATH` | Tenant credentials file for `auth-admin` | `app/tooling/admin/auth/config.json` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use crate::auth::jwks::{jwks_endpoint, DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT};
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const IMAS_URL_ENV: &str = "IMAS_URL";
pub const JWKS_URL_ENV: &str = "JWKS_URL";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const REQUIRED_PERMISSION_ENV: &str = "REQUIRED_PERMISSION";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const TOKEN_CONFIG_PATH_ENV: &str = "TOKEN_CONFIG_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_TOKEN_CONFIG_PATH: &str = "app/tooling/admin/auth/config.json";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("error reading config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error decoding config file: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("customer names {first:?} and {second:?} differ only in case")]
    DuplicateTenant { first: String, second: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Settings for the `publisher-api` server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwks_url: String,
    pub issuer: Option<String>,
    pub required_permission: String,
    pub jwks_cache_ttl: Duration,
    pub jwks_timeout: Duration,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let jwks_url = match (get(JWKS_URL_ENV), get(IMAS_URL_ENV)) {
            (Some(url), _) => url,
            (None, Some(imas_url)) => jwks_endpoint(&imas_url),
            (None, None) => return Err(ConfigError::MissingEnv(IMAS_URL_ENV)),
        };

        let required_permission = get(REQUIRED_PERMISSION_ENV)
            .ok_or(ConfigError::MissingEnv(REQUIRED_PERMISSION_ENV))?;

        let port = match get(PORT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: LOG_FORMAT_ENV,
                value,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: get(APP_ENV_ENV).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            jwks_url,
            issuer: get(JWT_ISSUER_ENV),
            required_permission,
            jwks_cache_ttl: seconds(get(JWKS_CACHE_TTL_ENV), JWKS_CACHE_TTL_ENV, DEFAULT_CACHE_TTL)?,
            jwks_timeout: seconds(get(JWKS_TIMEOUT_ENV), JWKS_TIMEOUT_ENV, DEFAULT_FETCH_TIMEOUT)?,
            log_format,
        })
    }

    /// Bind address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn seconds(
    value: Option<String>,
    name: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        None => Ok(default),
    }
}
