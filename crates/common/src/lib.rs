//! Shared configuration and retry primitives.
//!
//! This crate holds the pieces shared between the transport layer and the
//! API client: the typed [`ClientOptions`] configuration object, the
//! [`RetryPolicy`] governing bounded retries, and the [`Backoff`] state used
//! between attempts.

mod backoff;
mod options;

pub use backoff::{Backoff, RetryPolicy};
pub use options::{ClientOptions, DEFAULT_USER_AGENT};
