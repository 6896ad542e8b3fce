//! HTTP transport infrastructure.
//!
//! This crate wraps `reqwest` with the delivery semantics every API call
//! shares:
//!
//! - Auth strategy selection: Basic Auth over TLS, plaintext query
//!   credentials over TLS when requested, OAuth-signed URLs otherwise
//! - Bounded retries with doubling backoff for server errors and
//!   network-level failures
//! - JSON body encoding with the matching content-type header
//! - Consistent error handling via `RestError`
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::ApiCredentials;
//! use common::ClientOptions;
//! use rest_client::Transport;
//!
//! let credentials = ApiCredentials::from_env()?;
//! let transport = Transport::new(credentials, ClientOptions::default())?;
//!
//! let response = transport
//!     .send(reqwest::Method::GET, "https://store.test/wp-json/wc/v3/products", &[], None)
//!     .await?;
//! ```

mod client;
mod error;

pub use client::Transport;
pub use error::RestError;
