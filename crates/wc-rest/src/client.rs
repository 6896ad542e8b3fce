//! WooCommerce REST API client.

use auth::ApiCredentials;
use common::ClientOptions;
use reqwest::{Method, Response};
use rest_client::{RestError, Transport};
use serde::Serialize;

/// Client for one WooCommerce store.
///
/// Holds the store root URL, the immutable configuration, and the shared
/// transport. Cheap to share behind an `Arc`; every call is independent.
pub struct WooRestClient {
    url: String,
    options: ClientOptions,
    transport: Transport,
}

impl WooRestClient {
    /// Create a client with default options.
    ///
    /// # Arguments
    /// * `url` - Store root URL (e.g., "https://store.example.com")
    /// * `credentials` - Consumer key/secret pair
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: &str, credentials: ApiCredentials) -> Result<Self, RestError> {
        Self::with_options(url, credentials, ClientOptions::default())
    }

    /// Create a client with explicit options.
    pub fn with_options(
        url: &str,
        credentials: ApiCredentials,
        options: ClientOptions,
    ) -> Result<Self, RestError> {
        let transport = Transport::new(credentials, options.clone())?;

        Ok(Self {
            url: url.to_string(),
            options,
            transport,
        })
    }

    /// Build the full URL for an endpoint:
    /// `{root}/{wp-json|wc-api}/{version}/{endpoint}`.
    fn endpoint_url(&self, endpoint: &str) -> String {
        let root = self.url.trim_end_matches('/');
        let api = if self.options.wp_api { "wp-json" } else { "wc-api" };

        format!("{}/{}/{}/{}", root, api, self.options.version, endpoint)
    }

    /// GET a resource.
    ///
    /// # Arguments
    /// * `endpoint` - Resource path (e.g., "products")
    /// * `params` - Optional query parameters
    pub async fn get(
        &self,
        endpoint: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Response, RestError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = %endpoint, "GET request");

        self.transport
            .send(Method::GET, &url, params.unwrap_or_default(), None)
            .await
    }

    /// POST a resource.
    pub async fn post<T: Serialize>(
        &self,
        endpoint: &str,
        data: &T,
    ) -> Result<Response, RestError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = %endpoint, "POST request");

        let body = encode_body(data)?;
        self.transport
            .send(Method::POST, &url, &[], Some(&body))
            .await
    }

    /// PUT a resource.
    pub async fn put<T: Serialize>(
        &self,
        endpoint: &str,
        data: &T,
    ) -> Result<Response, RestError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = %endpoint, "PUT request");

        let body = encode_body(data)?;
        self.transport
            .send(Method::PUT, &url, &[], Some(&body))
            .await
    }

    /// DELETE a resource.
    pub async fn delete(&self, endpoint: &str) -> Result<Response, RestError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = %endpoint, "DELETE request");

        self.transport.send(Method::DELETE, &url, &[], None).await
    }

    /// OPTIONS request against a resource.
    pub async fn options(&self, endpoint: &str) -> Result<Response, RestError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(endpoint = %endpoint, "OPTIONS request");

        self.transport.send(Method::OPTIONS, &url, &[], None).await
    }
}

/// Serialize a request body as UTF-8 JSON, non-ASCII kept literal.
fn encode_body<T: Serialize>(data: &T) -> Result<Vec<u8>, RestError> {
    serde_json::to_vec(data).map_err(|e| RestError::RequestBuild(e.to_string()))
}

impl std::fmt::Debug for WooRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooRestClient")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish()
    }
}
