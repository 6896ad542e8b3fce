//! Authentication and signing for the WooCommerce REST API.
//!
//! This crate provides secure credential management and OAuth 1.0a request
//! signing for stores served over plain HTTP, where Basic Auth would leak
//! credentials.
//!
//! # Features
//!
//! - **Secure Credentials**: the consumer secret is wrapped in
//!   `SecretString` to prevent accidental logging and ensure memory is
//!   zeroed on drop.
//! - **OAuth 1.0a Signing**: reproduces the WooCommerce server-side
//!   verifier byte-exactly, including its non-standard encoding quirks.
//! - **Environment Loading**: credentials can be loaded from environment
//!   variables or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{ApiCredentials, OauthSigner};
//!
//! // Load credentials from environment
//! let credentials = ApiCredentials::from_env()?;
//!
//! // Create a signer for the wc/v3 API
//! let signer = OauthSigner::new(&credentials, "wc/v3");
//!
//! // Produce a URL the server will accept
//! let url = signer.signed_url("http://store.test/wp-json/wc/v3/products", "GET")?;
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::ApiCredentials;
pub use error::AuthError;
pub use oauth::{generate_nonce, OauthSigner, ParamValue};
