use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{HeaderMap, request::Parts},
};
use shoplist_types::api::fields;
use shoplist_types::models::EntryId;

use crate::error::ApiError;

/// The claimed identity of a request, straight from the `uid` and `token`
/// headers. Never rejects: missing values are the gate's business.
#[derive(Clone, Default)]
pub struct Credentials {
    pub uid: Option<String>,
    pub token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("uid", &self.uid)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Credentials {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            uid: header_value(&parts.headers, fields::UID),
            token: header_value(&parts.headers, fields::TOKEN),
        })
    }
}

/// Per-request options for `/entry`. Headers win over query parameters.
#[derive(Debug, Clone, Default)]
pub struct EntryParams {
    pub element_id: Option<String>,
    pub json: Option<String>,
    pub encoding: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for EntryParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query: HashMap<String, String> = Query::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        let lookup = |name: &str| header_value(&parts.headers, name).or_else(|| query.get(name).cloned());

        Ok(Self {
            element_id: lookup(fields::ELEMENT_ID),
            json: lookup(fields::JSON),
            encoding: lookup(fields::ENCODING),
        })
    }
}

impl EntryParams {
    pub fn entry_id(&self) -> Result<EntryId, ApiError> {
        self.element_id
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .ok_or(ApiError::InvalidEntry)
    }

    /// `json=0` selects the bare content; anything else (or nothing) selects
    /// the JSON projection.
    pub fn wants_plain(&self) -> bool {
        self.json.as_deref() == Some("0")
    }

    /// Decode a request body. Only UTF-8 (and its ASCII subset) is supported.
    pub fn decode_body(&self, body: &[u8]) -> Result<String, ApiError> {
        let encoding = self.encoding.as_deref().unwrap_or("utf-8").to_ascii_lowercase();
        match encoding.as_str() {
            "utf-8" | "utf8" => String::from_utf8(body.to_vec())
                .map_err(|_| ApiError::Validation("Content is not valid utf-8.".to_string())),
            "ascii" | "us-ascii" => {
                if !body.is_ascii() {
                    return Err(ApiError::Validation("Content is not valid ascii.".to_string()));
                }
                Ok(body.iter().map(|&b| b as char).collect())
            }
            other => Err(ApiError::Validation(format!("Unsupported encoding {}.", other))),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
