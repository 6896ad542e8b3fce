//! Secure API credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the consumer
//! secret and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Consumer key/secret pair for a WooCommerce store.
///
/// Immutable for the lifetime of a client instance. The consumer secret is
/// wrapped in `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct ApiCredentials {
    consumer_key: String,
    consumer_secret: SecretString,
}

impl ApiCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `WOOCOMMERCE_CONSUMER_KEY` - The consumer key (`ck_...`)
    /// - `WOOCOMMERCE_CONSUMER_SECRET` - The consumer secret (`cs_...`)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is not set.
    pub fn from_env() -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let consumer_key = std::env::var("WOOCOMMERCE_CONSUMER_KEY")
            .map_err(|_| AuthError::MissingEnvVar("WOOCOMMERCE_CONSUMER_KEY".into()))?;

        let consumer_secret = std::env::var("WOOCOMMERCE_CONSUMER_SECRET")
            .map_err(|_| AuthError::MissingEnvVar("WOOCOMMERCE_CONSUMER_SECRET".into()))?;

        Ok(Self::new(consumer_key, consumer_secret))
    }

    /// Create credentials from explicit values.
    pub fn new(consumer_key: String, consumer_secret: String) -> Self {
        Self {
            consumer_key,
            consumer_secret: SecretString::from(consumer_secret),
        }
    }

    /// Get the consumer key (public, safe to log).
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Expose the consumer secret for signing or Basic Auth.
    ///
    /// **WARNING**: Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}
