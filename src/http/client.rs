// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{HttpError, Payload};

/// Largest successful response body read into memory.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Prefix of a rejected response's body kept in [`HttpError::UnexpectedStatus`].
pub const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// A response whose status was in the 2xx range.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the full body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(HttpError::Decode)
    }
}

/// Minimal JSON-over-HTTP client bound to a base URL.
///
/// Sends exactly one request per call: no retries, no backoff. Clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    /// Create a client for `base_url` whose requests time out after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| HttpError::Transport(format!("invalid base URL {base_url}: {e}")))?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `base_url + path` and return the 2xx response.
    ///
    /// `headers` are used as given. A payload's content type then replaces
    /// any `Content-Type` among them. Statuses outside 200..300 come back
    /// as [`HttpError::UnexpectedStatus`] with the first
    /// [`MAX_ERROR_BODY_BYTES`] of the raw body. A success body longer than
    /// [`MAX_RESPONSE_BYTES`] is a transport error. Cancelling
    /// `cancel` aborts the in-flight call.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        payload: Option<&Payload>,
    ) -> Result<HttpResponse, HttpError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = headers.unwrap_or_default();
        let mut request = self.http.request(method.clone(), &url);
        if let Some(payload) = payload {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(payload.content_type()),
            );
            request = request.body(payload.as_bytes().to_vec());
        }
        let request = request.headers(headers);

        debug!(
            %method,
            %url,
            payload_bytes = payload.map(Payload::len).unwrap_or(0),
            "sending request"
        );

        let send = async {
            let response = request.send().await.map_err(HttpError::transport)?;
            let status = response.status();
            if status.is_success() {
                let (body, truncated) = read_body(response, MAX_RESPONSE_BYTES).await?;
                if truncated {
                    return Err(HttpError::Transport(format!(
                        "response body exceeds {MAX_RESPONSE_BYTES} bytes"
                    )));
                }
                Ok(HttpResponse { status, body })
            } else {
                // only a prefix is needed for the error
                let (body, _) = read_body(response, MAX_ERROR_BODY_BYTES).await?;
                Ok(HttpResponse { status, body })
            }
        };

        let response = tokio::select! {
            result = send => result?,
            _ = cancel.cancelled() => {
                debug!(%method, %url, "request cancelled");
                return Err(HttpError::Cancelled);
            }
        };

        debug!(%method, %url, status = response.status.as_u16(), "received response");

        if !response.status.is_success() {
            return Err(HttpError::UnexpectedStatus {
                status: response.status.as_u16(),
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response)
    }

    /// GET `path` and decode the JSON response into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<T, HttpError> {
        self.execute(cancel, Method::GET, path, headers, None)
            .await?
            .json()
    }

    /// POST `payload` to `path` and decode the JSON response into `T`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        path: &str,
        headers: Option<HeaderMap>,
        payload: &Payload,
    ) -> Result<T, HttpError> {
        self.execute(cancel, Method::POST, path, headers, Some(payload))
            .await?
            .json()
    }
}

/// Read at most `limit` bytes of the body. The flag is set when the body
/// was longer and reading stopped early.
async fn read_body(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<(Vec<u8>, bool), HttpError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(HttpError::transport)? {
        let room = limit - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            return Ok((body, true));
        }
        body.extend_from_slice(&chunk);
    }
    Ok((body, false))
}
