//! A single Chatwork API call and how it maps onto HTTP.
//!
//! # Design
//! `ApiRequest` is built per call, configured, turned into an `HttpRequest`
//! once and discarded. Parameter placement depends only on the method: GET
//! and DELETE carry them in the query string, POST and PUT in a
//! form-encoded body.

use crate::config::TOKEN_HEADER;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::Params;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: HttpMethod,
    endpoint: String,
    params: Params,
    api_key: String,
}

impl ApiRequest {
    pub fn new(api_key: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            method,
            endpoint: String::new(),
            params: Params::new(),
            api_key: api_key.into(),
        }
    }

    pub fn get(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new(api_key, HttpMethod::Get).endpoint(endpoint)
    }

    /// Endpoint path relative to the versioned API root, e.g. `rooms/123`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.set_endpoint(endpoint);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.set_params(params);
        self
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
    }

    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint_path(&self) -> &str {
        &self.endpoint
    }

    pub fn param_list(&self) -> &Params {
        &self.params
    }

    /// `X-ChatWorkToken: <key>`
    pub fn auth_header(&self) -> (String, String) {
        (TOKEN_HEADER.to_string(), self.api_key.clone())
    }

    /// Render the request against `base_url` (e.g. `https://api.chatwork.com/v2`).
    pub fn build(&self, base_url: &str) -> Result<HttpRequest, ApiError> {
        let endpoint = self.endpoint.trim_start_matches('/');
        if endpoint.is_empty() {
            return Err(ApiError::NoEndpoint);
        }
        if self.api_key.is_empty() {
            return Err(ApiError::NoApiKey);
        }

        let mut url = format!("{}/{endpoint}", base_url.trim_end_matches('/'));
        let mut headers = vec![self.auth_header()];
        let mut body = None;

        let encoded = self.params.encode();
        if self.method.uses_query_string() {
            if let Some(query) = encoded {
                url.push('?');
                url.push_str(&query);
            }
        } else if let Some(form) = encoded {
            headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
            body = Some(form);
        }

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}
