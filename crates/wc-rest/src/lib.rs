//! WooCommerce REST API client.
//!
//! This crate provides the outward-facing client surface:
//!
//! - **Path construction**: `{root}/{wp-json|wc-api}/{version}/{endpoint}`
//! - **Verb surface**: GET, POST, PUT, DELETE, OPTIONS
//! - **Typed configuration**: every recognized option lives in
//!   [`common::ClientOptions`] with validated defaults
//!
//! Responses come back as raw `reqwest::Response` objects; resource-specific
//! semantics and body schemas are the caller's concern.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::ApiCredentials;
//! use wc_rest::WooRestClient;
//!
//! let credentials = ApiCredentials::from_env()?;
//! let client = WooRestClient::new("https://store.example.com", credentials)?;
//!
//! // List products
//! let response = client.get("products", Some(&[("per_page", "25")])).await?;
//!
//! // Create a product
//! let response = client
//!     .post("products", &serde_json::json!({ "name": "Beanie", "type": "simple" }))
//!     .await?;
//! ```

mod client;

pub use client::WooRestClient;

pub use auth::{ApiCredentials, AuthError};
pub use common::{ClientOptions, RetryPolicy};
pub use rest_client::RestError;
