// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound HTTP with typed JSON payloads and classified errors.
//!
//! ```rust,ignore
//! let client = HttpClient::new("https://imas.example.com", Duration::from_secs(10))?;
//! let payload = Payload::json(&request)?;
//! let response: TokenResponse = client.post(&cancel, "/v1/token", None, &payload).await?;
//! ```

mod client;
mod error;
mod payload;

pub use client::{HttpClient, HttpResponse, MAX_ERROR_BODY_BYTES, MAX_RESPONSE_BYTES};
pub use error::HttpError;
pub use payload::Payload;
