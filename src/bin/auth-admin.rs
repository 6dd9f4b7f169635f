// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Administrative tooling for service tokens.
//!
//! ```text
//! auth-admin acmecorp prod tokengen --config app/tooling/admin/auth/config.json
//! ```
//!
//! The generated token is printed on stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use publisher_gateway::{
    config::{DEFAULT_TOKEN_CONFIG_PATH, LOG_FORMAT_ENV, TOKEN_CONFIG_PATH_ENV},
    logging::{init_logging, LogFormat},
    tokengen::{generate_token, TokenConfig},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "auth-admin", version, about = "Service token administration")]
struct Cli {
    /// Customer (tenant) name, case-insensitive
    customer: String,

    /// Environment whose token endpoint is used (e.g. dev, stage, prod)
    environment: String,

    /// Action to perform
    action: Action,

    /// Tenant credentials file
    #[arg(long, env = TOKEN_CONFIG_PATH_ENV, default_value = DEFAULT_TOKEN_CONFIG_PATH)]
    config: PathBuf,

    /// Log output format
    #[arg(long, env = LOG_FORMAT_ENV, value_enum, ignore_case = true, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Generate an access token through the client-credentials grant
    Tokengen,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    let config = match TokenConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "error loading config");
            return ExitCode::FAILURE;
        }
    };

    match cli.action {
        Action::Tokengen => tokengen(&config, &cli.customer, &cli.environment).await,
    }
}

async fn tokengen(config: &TokenConfig, customer: &str, environment: &str) -> ExitCode {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    match generate_token(config, customer, environment, &cancel).await {
        Ok(token) => {
            info!(%customer, %environment, "token generated successfully");
            println!("{token}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                error = %e,
                available_customers = ?config.customer_names(),
                "error generating token"
            );
            ExitCode::FAILURE
        }
    }
}
