// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use publisher_gateway::{
    api::router,
    auth::{AuthContext, JwksManager},
    config::{ConfigError, ServerConfig},
    logging::init_logging,
    state::AppState,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let jwks = JwksManager::new(&config.jwks_url, config.jwks_timeout)
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?
        .with_cache_ttl(config.jwks_cache_ttl);

    let mut auth = AuthContext::new(&config.environment, jwks, &config.required_permission);
    if let Some(ref issuer) = config.issuer {
        auth = auth.with_issuer(issuer);
    }

    let app = router(AppState::new(auth));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        environment = %config.environment,
        jwks_url = %config.jwks_url,
        required_permission = %config.required_permission,
        "publisher-api listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("publisher-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
