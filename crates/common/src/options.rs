//! Client configuration.
//!
//! One immutable options struct constructed per client instance. Every
//! recognized option is enumerated here with its default; there is no
//! process-wide shared configuration.

use crate::backoff::RetryPolicy;
use std::time::Duration;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("wc-rest/", env!("CARGO_PKG_VERSION"));

/// Configuration for a WooCommerce API client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Use the `wp-json` path prefix (WP REST API) instead of legacy `wc-api`.
    pub wp_api: bool,
    /// API version segment, e.g. "wc/v3". Also selects the signature
    /// variant: "v1" and "v2" use the legacy secret without a trailing `&`.
    pub version: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Verify TLS certificates.
    pub verify_tls: bool,
    /// Over TLS, send credentials as plaintext query parameters instead of
    /// an HTTP Basic Auth header. Some servers reject Basic Auth.
    pub query_string_auth: bool,
    /// User agent header value.
    pub user_agent: String,
    /// Retry and backoff behavior.
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            wp_api: true,
            version: "wc/v3".to_string(),
            timeout: Duration::from_secs(5),
            verify_tls: true,
            query_string_auth: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}
