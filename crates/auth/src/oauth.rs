//! OAuth 1.0a request signing for unauthenticated (non-TLS) endpoints.
//!
//! WooCommerce verifies signatures with a scheme derived from OAuth 1.0a
//! but not identical to it: parameter values are coerced the way PHP would
//! coerce them, percent signs produced by encoding are escaped a second
//! time, and the signature base string joins its query pairs with the
//! literal sequences `%3D` and `%26` instead of `=` and `&`. All of this is
//! a fixed wire contract; the server rejects anything that is not
//! byte-exact.

use crate::credentials::ApiCredentials;
use crate::error::AuthError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha1::Sha1;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

type HmacSha256 = Hmac<Sha256>;
type HmacSha1 = Hmac<Sha1>;

/// A request parameter value before normalization.
///
/// Closed set of the value shapes a query parameter can take; the
/// normalization step matches it exhaustively instead of duck-typing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Coerce to a string the way PHP would.
    ///
    /// Booleans become `"1"` or `""`, floats with a zero fractional part
    /// lose their decimal point (`3.0` -> `"3"`).
    fn to_php_string(&self) -> String {
        match self {
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => String::new(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                (*f as i64).to_string()
            }
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// Request signer producing server-verifiable OAuth URLs.
pub struct OauthSigner<'a> {
    credentials: &'a ApiCredentials,
    version: &'a str,
}

impl<'a> OauthSigner<'a> {
    /// Create a signer for the given credentials and API version.
    ///
    /// The version string selects the secret variant: `v1` and `v2` sign
    /// with the bare consumer secret, every other version (including
    /// unknown ones) appends a trailing `&`.
    pub fn new(credentials: &'a ApiCredentials, version: &'a str) -> Self {
        Self {
            credentials,
            version,
        }
    }

    /// Return `url` with the OAuth query string appended.
    ///
    /// Timestamp and nonce are generated; use [`signed_url_with`] to pin
    /// them for reproducible output. No network I/O occurs here.
    ///
    /// [`signed_url_with`]: OauthSigner::signed_url_with
    pub fn signed_url(&self, url: &str, method: &str) -> Result<String, AuthError> {
        self.signed_url_with(url, method, unix_timestamp(), &generate_nonce())
    }

    /// Return `url` with the OAuth query string appended, using an explicit
    /// timestamp and nonce.
    ///
    /// Any query parameters already present on `url` are folded into the
    /// signed parameter set. Fails with `AuthError::InvalidUrl` if the URL
    /// cannot be parsed; otherwise total over its input domain.
    pub fn signed_url_with(
        &self,
        url: &str,
        method: &str,
        timestamp: u64,
        nonce: &str,
    ) -> Result<String, AuthError> {
        let mut parsed =
            Url::parse(url).map_err(|_| AuthError::InvalidUrl(url.to_string()))?;

        let mut params: Vec<(String, ParamValue)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), ParamValue::Text(v.into_owned())))
            .collect();
        parsed.set_query(None);
        parsed.set_fragment(None);
        let base_url = parsed.to_string();

        params.push((
            "oauth_consumer_key".to_string(),
            ParamValue::Text(self.credentials.consumer_key().to_string()),
        ));
        params.push(("oauth_timestamp".to_string(), ParamValue::Int(timestamp as i64)));
        params.push(("oauth_nonce".to_string(), ParamValue::Text(nonce.to_string())));
        params.push((
            "oauth_signature_method".to_string(),
            ParamValue::Text("HMAC-SHA256".to_string()),
        ));

        let signature = self.signature(method, &base_url, &params);
        params.push(("oauth_signature".to_string(), ParamValue::Text(signature)));

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (k.clone(), v.to_php_string())))
            .finish();

        Ok(format!("{}?{}", base_url, query))
    }

    /// Compute the `oauth_signature` value for the given parameter set.
    ///
    /// `base_url` must carry no query string; any `oauth_signature` left in
    /// `params` from a prior round is ignored. The caller's parameters are
    /// never mutated.
    pub fn signature(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, ParamValue)],
    ) -> String {
        let string_to_sign = signature_base_string(method, base_url, params);

        let mut secret = self.credentials.expose_secret().to_string();
        // Legacy v1/v2 verifiers sign with the bare secret.
        if !matches!(self.version, "v1" | "v2") {
            secret.push('&');
        }

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());

        BASE64.encode(mac.finalize().into_bytes()).replace('\n', "")
    }
}

/// Build the exact string that gets HMAC-signed.
fn signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(String, ParamValue)],
) -> String {
    let mut params: Vec<&(String, ParamValue)> = params
        .iter()
        .filter(|(key, _)| key != "oauth_signature")
        .collect();
    group_sort(&mut params);

    let query = params
        .iter()
        .map(|(key, value)| {
            let (key, value) = normalize_pair(key, value);
            // Literal %3D, not '='. The server reproduces this join verbatim.
            format!("{}%3D{}", key, value)
        })
        .collect::<Vec<_>>()
        .join("%26");

    format!("{}&{}&{}", method, quote_all(base_url), query)
}

/// Sort parameters by the base name before an optional `[`, keeping the
/// original relative order among keys that share a base name.
///
/// Bracketed siblings like `b[c]`, `b[a]`, `b[b]` stay grouped under `b` in
/// their original order even though a pure lexicographic sort would reorder
/// them.
fn group_sort(params: &mut [&(String, ParamValue)]) {
    // Stable sort keeps same-base siblings in place.
    params.sort_by(|a, b| base_name(&a.0).cmp(base_name(&b.0)));
}

fn base_name(key: &str) -> &str {
    key.split('[').next().unwrap_or(key)
}

/// Percent-encode one key or value, then re-escape `%` to `%25`.
///
/// The doubled escape is intentional: the signed form survives the second
/// round of decoding the server applies before verification.
fn normalize_pair(key: &str, value: &ParamValue) -> (String, String) {
    let requote = |s: &str| quote_keep_slash(&unquote(s)).replace('%', "%25");
    (requote(key), requote(&value.to_php_string()))
}

/// Decode existing percent-escapes, leaving the input untouched if it does
/// not decode cleanly.
fn unquote(input: &str) -> String {
    urlencoding::decode(input)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Percent-encode with `/` kept literal (parameter keys and values).
fn quote_keep_slash(input: &str) -> String {
    urlencoding::encode(input).replace("%2F", "/")
}

/// Percent-encode with no characters spared (the base URL segment).
fn quote_all(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Generate a request nonce.
///
/// An 8-digit random decimal string run through HMAC-SHA1 with a fixed key
/// and hex-encoded. Not cryptographically meaningful; it only needs to be
/// unpredictable and distinct per request with high probability.
pub fn generate_nonce() -> String {
    let seed = format!("{:08}", rand::thread_rng().gen_range(0..100_000_000u32));

    let mut mac =
        HmacSha1::new_from_slice(b"secret").expect("HMAC can take key of any size");
    mac.update(seed.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
