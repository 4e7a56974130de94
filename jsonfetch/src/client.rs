//! HTTP client that runs the request, validate, decode pipeline.

use std::error::Error as StdError;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::{
    config::ClientConfig,
    decode::decode_response,
    request::{RawResponse, RequestDescriptor},
    ApiError,
};

/// Sends caller-built requests and decodes their JSON responses.
///
/// Cloning is cheap and clones share one connection pool. The client holds no
/// other state, so concurrent calls never observe each other. Dropping a
/// returned future cancels its request.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with [`ClientConfig::default`].
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .default_headers(header_map(&config.default_headers)?);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http = builder.build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            ApiError::network(describe(&e))
        })?;
        Ok(Self { http })
    }

    /// Wraps an existing `reqwest::Client`, keeping its settings.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Sends `request` and collects the response without looking at its status.
    ///
    /// Anything that keeps a complete response from arriving, including a body
    /// stream that breaks midway, is an [`ApiError::Network`].
    pub async fn execute(&self, request: RequestDescriptor) -> Result<RawResponse, ApiError> {
        let RequestDescriptor {
            method,
            url,
            headers,
            body,
        } = request;
        tracing::debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request: {}", e);
            ApiError::network(describe(&e))
        })?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            ApiError::network(describe(&e))
        })?;
        tracing::debug!("received status {} with {} byte body", status, body.len());

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    /// Sends `request`, checks for a `2xx` status and decodes the body into `T`.
    ///
    /// `call_context` names the logical operation in error reasons, e.g.
    /// `"listRepositories"`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
        call_context: &str,
    ) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        decode_response(response, call_context)
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::Network {
            reason: format!("invalid default header name {:?}: {}", name, e),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| ApiError::Network {
            reason: format!("invalid default header value for {}: {}", name, e),
        })?;
        map.append(name, value);
    }
    Ok(map)
}

/// The error message followed by each of its sources.
fn describe(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
