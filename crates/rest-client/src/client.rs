//! HTTP transport wrapping reqwest with auth selection and retries.

use crate::error::RestError;
use auth::{ApiCredentials, OauthSigner};
use common::{Backoff, ClientOptions};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Transport for one store's API calls.
///
/// Owns a pooled `reqwest::Client`; safe to share across concurrent calls.
/// No call-specific state lives here, so unrelated calls never contend.
pub struct Transport {
    client: Client,
    credentials: ApiCredentials,
    options: ClientOptions,
}

/// A request ready to send: final URL plus whether to attach Basic Auth.
struct PreparedRequest {
    url: String,
    basic_auth: bool,
}

impl Transport {
    /// Create a transport for the given credentials and options.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: ApiCredentials, options: ClientOptions) -> Result<Self, RestError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .danger_accept_invalid_certs(!options.verify_tls)
            .default_headers(headers)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
            options,
        })
    }

    /// Execute one logical call against `url` with bounded retries.
    ///
    /// `params` are merged into the URL's query string before the auth
    /// strategy is chosen. `body` is sent verbatim as a JSON payload with
    /// the matching content-type header.
    ///
    /// Responses outside the retryable status set are returned immediately,
    /// 4xx included; interpreting them is the caller's job. Server errors
    /// and network failures are retried with doubling backoff until
    /// `max_retries` attempts have been made.
    ///
    /// # Errors
    /// `RestError::InvalidUrl` if `url` does not parse,
    /// `RestError::RetriesExhausted` once all attempts are spent.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<Response, RestError> {
        let prepared = self.prepare(&method, url, params)?;

        let mut backoff = Backoff::new(self.options.retry.initial_backoff);
        let mut attempt: u32 = 1;

        loop {
            let mut request = self.client.request(method.clone(), &prepared.url);

            if prepared.basic_auth {
                request = request.basic_auth(
                    self.credentials.consumer_key(),
                    Some(self.credentials.expose_secret()),
                );
            }

            if let Some(bytes) = body {
                request = request
                    .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                    .body(bytes.to_vec());
            }

            tracing::debug!(endpoint = %url, method = %method, attempt, "sending request");

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !self.options.retry.should_retry_status(status) {
                        return Ok(response);
                    }
                    tracing::warn!(endpoint = %url, status, attempt, "retryable status");
                }
                Err(err) => {
                    let err = RestError::from(err);
                    tracing::error!(endpoint = %url, error = %err, attempt, "request failed");
                }
            }

            if attempt >= self.options.retry.max_retries {
                break;
            }

            let delay = backoff.next_delay();
            tracing::warn!(
                endpoint = %url,
                delay_ms = delay.as_millis() as u64,
                "backing off before next attempt"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }

        Err(RestError::RetriesExhausted {
            endpoint: url.to_string(),
        })
    }

    /// Choose the auth strategy and produce the final request URL.
    ///
    /// Secured endpoints use HTTP Basic Auth, or plaintext query credentials
    /// when `query_string_auth` is set. Unsecured endpoints get an
    /// OAuth-signed URL instead; no auth header is attached.
    fn prepare(
        &self,
        method: &Method,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<PreparedRequest, RestError> {
        let mut target = Url::parse(url).map_err(|_| RestError::InvalidUrl(url.to_string()))?;

        if !params.is_empty() {
            target.query_pairs_mut().extend_pairs(params.iter());
        }

        let secured = target.scheme() == "https";

        if secured && !self.options.query_string_auth {
            Ok(PreparedRequest {
                url: target.into(),
                basic_auth: true,
            })
        } else if secured {
            target
                .query_pairs_mut()
                .append_pair("consumer_key", self.credentials.consumer_key())
                .append_pair("consumer_secret", self.credentials.expose_secret());

            Ok(PreparedRequest {
                url: target.into(),
                basic_auth: false,
            })
        } else {
            let signer = OauthSigner::new(&self.credentials, &self.options.version);
            let signed = signer.signed_url(target.as_str(), method.as_str())?;

            Ok(PreparedRequest {
                url: signed,
                basic_auth: false,
            })
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("consumer_key", &self.credentials.consumer_key())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::RetryPolicy;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ApiCredentials {
        ApiCredentials::new("ck_test".into(), "cs_test".into())
    }

    fn fast_options() -> ClientOptions {
        ClientOptions {
            retry: RetryPolicy {
                max_retries: 3,
                initial_backoff: Duration::from_millis(10),
                ..RetryPolicy::default()
            },
            ..ClientOptions::default()
        }
    }

    fn transport() -> Transport {
        Transport::new(credentials(), fast_options()).expect("transport")
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/wp-json/wc/v3/products", server.uri());
        let response = transport()
            .send(Method::GET, &url, &[], None)
            .await
            .expect("response");

        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_client_error_passes_through_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/wp-json/wc/v3/products/999", server.uri());
        let response = transport()
            .send(Method::GET, &url, &[], None)
            .await
            .expect("response");

        assert_eq!(response.status().as_u16(), 404);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
                if current < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let url = format!("{}/wp-json/wc/v3/orders", server.uri());
        let response = transport()
            .send(Method::GET, &url, &[], None)
            .await
            .expect("response");

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_names_the_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let url = format!("{}/wp-json/wc/v3/orders", server.uri());
        let result = transport().send(Method::GET, &url, &[], None).await;

        match result {
            Err(RestError::RetriesExhausted { endpoint }) => {
                assert_eq!(endpoint, url);
            }
            other => panic!("expected RetriesExhausted, got {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_retries_until_exhaustion() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so requests fail with ECONNREFUSED
        let url = format!("http://{}/wp-json/wc/v3/products", addr);

        let result = transport().send(Method::GET, &url, &[], None).await;

        assert!(matches!(result, Err(RestError::RetriesExhausted { .. })));
    }

    #[tokio::test]
    async fn test_plain_http_carries_oauth_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/wp-json/wc/v3/products", server.uri());
        transport()
            .send(Method::GET, &url, &[("per_page", "25")], None)
            .await
            .expect("response");

        let requests = server.received_requests().await.unwrap();
        let keys: Vec<String> = requests[0]
            .url
            .query_pairs()
            .map(|(k, _)| k.into_owned())
            .collect();

        assert!(keys.contains(&"per_page".to_string()));
        assert!(keys.contains(&"oauth_consumer_key".to_string()));
        assert!(keys.contains(&"oauth_timestamp".to_string()));
        assert!(keys.contains(&"oauth_nonce".to_string()));
        assert!(keys.contains(&"oauth_signature_method".to_string()));
        assert!(keys.contains(&"oauth_signature".to_string()));
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_json_body_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wp-json/wc/v3/products"))
            .and(header("content-type", "application/json;charset=utf-8"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let body = serde_json::to_vec(&serde_json::json!({ "name": "Caffè" })).unwrap();
        let url = format!("{}/wp-json/wc/v3/products", server.uri());
        let response = transport()
            .send(Method::POST, &url, &[], Some(&body))
            .await
            .expect("response");

        assert_eq!(response.status().as_u16(), 201);

        // Non-ASCII stays literal UTF-8, not \u-escaped.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].body, "{\"name\":\"Caffè\"}".as_bytes());
    }

    #[test]
    fn test_prepare_tls_uses_basic_auth() {
        let prepared = transport()
            .prepare(&Method::GET, "https://woo.test/wp-json/wc/v3/products", &[])
            .unwrap();

        assert!(prepared.basic_auth);
        assert_eq!(prepared.url, "https://woo.test/wp-json/wc/v3/products");
    }

    #[test]
    fn test_prepare_tls_query_string_auth() {
        let options = ClientOptions {
            query_string_auth: true,
            ..fast_options()
        };
        let transport = Transport::new(credentials(), options).unwrap();

        let prepared = transport
            .prepare(
                &Method::GET,
                "https://woo.test/wp-json/wc/v3/products",
                &[("per_page", "25")],
            )
            .unwrap();

        assert!(!prepared.basic_auth);
        let parsed = Url::parse(&prepared.url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("per_page".to_string(), "25".to_string())));
        assert!(pairs.contains(&("consumer_key".to_string(), "ck_test".to_string())));
        assert!(pairs.contains(&("consumer_secret".to_string(), "cs_test".to_string())));
    }

    #[test]
    fn test_prepare_plain_http_signs_url() {
        let prepared = transport()
            .prepare(&Method::GET, "http://woo.test/wp-json/wc/v3/products", &[])
            .unwrap();

        assert!(!prepared.basic_auth);
        assert!(prepared.url.contains("oauth_signature="));
    }

    #[test]
    fn test_prepare_rejects_malformed_url() {
        let result = transport().prepare(&Method::GET, "not a url", &[]);
        assert!(matches!(result, Err(RestError::InvalidUrl(_))));
    }
}
