//! Normalizing an `HttpResponse` into an `ApiResponse`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{Headers, HttpResponse};

pub const RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
pub const RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

/// Quota figures reported by the server. A header that is absent or not a
/// number stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Epoch seconds at which the quota refills.
    pub reset: Option<u64>,
}

impl RateLimit {
    pub fn from_headers(headers: &Headers) -> Self {
        let read = |name: &str| {
            headers
                .get_ignore_case(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
        };
        Self {
            limit: read(RATE_LIMIT_LIMIT),
            remaining: read(RATE_LIMIT_REMAINING),
            reset: read(RATE_LIMIT_RESET),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub http_status: u16,
    /// Decoded JSON body; `Value::Null` when the server sent none or sent
    /// something that is not JSON.
    pub body: Value,
    pub headers: Headers,
    pub rate_limit: RateLimit,
}

impl ApiResponse {
    /// Decode the body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Decode a list body. An empty body (Chatwork answers `204` when a list
    /// has nothing new) yields an empty list.
    pub fn decode_list<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        if self.body.is_null() {
            return Ok(Vec::new());
        }
        self.decode()
    }
}

/// Interpret a raw response: coalesce headers, decode the body, fail on
/// status >= 400 and pull out the rate-limit figures.
///
/// A body that is not JSON decodes to `Value::Null`; only a status >= 400
/// makes the call fail.
pub fn parse_response(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    let headers = Headers::from_pairs(response.headers);
    let body = decode_body(&response.body);

    if response.status >= 400 {
        return Err(ApiError::RequestFailed {
            status: response.status,
            errors: extract_errors(&body),
        });
    }

    let rate_limit = RateLimit::from_headers(&headers);
    Ok(ApiResponse {
        http_status: response.status,
        body,
        headers,
        rate_limit,
    })
}

fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        debug!(error = %e, "response body is not JSON");
        Value::Null
    })
}

/// The body's `errors` field as a list of strings. Chatwork sends an array;
/// a bare string is accepted too.
fn extract_errors(body: &Value) -> Vec<String> {
    match body.get("errors") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.to_string()],
    }
}
