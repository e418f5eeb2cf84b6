//! Async JSON transport over a fixed base URL.
//!
//! # Design
//! `HttpTransport` wraps a pooled `reqwest::Client` and an immutable base
//! URL passed in at construction. Each call performs exactly one round trip:
//! no retry, no caching, no deduplication. Non-2xx responses become
//! `ApiError::Status` without reading the body.
//!
//! `execute` is the host-does-IO entry point for `CatalogClient`: it returns
//! every status as data and leaves interpretation to the `parse_*` methods.

use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn, Span};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};

/// Asynchronous JSON client bound to one API origin.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a fresh connection pool.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a transport that shares an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request to `path` and decode the 2xx body as `T`.
    ///
    /// ## Errors
    ///
    /// - `ApiError::Transport` if the request never got a response
    /// - `ApiError::Status` for any status outside 200..=299
    /// - `ApiError::Deserialization` if the body is not JSON for `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = HttpRequest::new(&self.base_url, path, options);
        let response = self.send(&request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, url = %request.url, "response body did not match expected shape");
            ApiError::Deserialization(e)
        })
    }

    /// Issue one request to `path` for an endpoint with no response body.
    pub async fn request_no_content(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<(), ApiError> {
        let request = HttpRequest::new(&self.base_url, path, options);
        self.send(&request).await?;
        Ok(())
    }

    /// Execute a prebuilt request and return the response as plain data,
    /// whatever its status.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.dispatch(request).await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send(&self, request: &HttpRequest) -> Result<reqwest::Response, ApiError> {
        let response = self.dispatch(request).await?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), url = %request.url, "non-success status");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
        )
    )]
    async fn dispatch(&self, request: &HttpRequest) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            let header_value = HeaderValue::try_from(value.as_str())
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            builder = builder.header(header_name, header_value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "request failed before a response arrived");
            ApiError::Transport(e)
        })?;

        Span::current().record("http.status_code", response.status().as_u16());
        Ok(response)
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
