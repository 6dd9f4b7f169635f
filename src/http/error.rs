// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// Errors from an outbound HTTP call.
///
/// `UnexpectedStatus` means the server rejected the request; `Decode` means
/// it accepted the request but answered with a body that does not parse.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request payload could not be serialized
    #[error("error marshaling JSON payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Request construction or network failure, including timeouts
    #[error("error making request: {0}")]
    Transport(String),

    /// The caller cancelled the call before it completed
    #[error("request cancelled")]
    Cancelled,

    #[error("unexpected status code: {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("error unmarshaling response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl HttpError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        HttpError::Transport(err.to_string())
    }

    /// Status code of a rejected response, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
