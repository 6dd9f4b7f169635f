// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::Serialize;

use super::HttpError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// A serialized request body and the content type it was serialized as.
///
/// Built once per outbound call. The bytes are not exposed through `Debug`
/// since payloads routinely carry credentials.
#[derive(Clone)]
pub struct Payload {
    data: Vec<u8>,
    content_type: &'static str,
}

impl Payload {
    /// Serialize `value` as a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HttpError> {
        let data = serde_json::to_vec(value).map_err(HttpError::Encode)?;
        Ok(Self {
            data,
            content_type: JSON_CONTENT_TYPE,
        })
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload")
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}
