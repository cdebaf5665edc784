//! OAuth authentication module for Twitter/X API integration.
//!
//! User-context requests (identity lookup, posting tweets) are signed with
//! OAuth 1.0a HMAC-SHA1. App-only requests use an OAuth 2.0 Bearer Token.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;

use crate::config::TwitterConfig;
use crate::error::{ApiError, ApiResult};

/// Builds the Authorization header for OAuth 2.0 Bearer Token authentication.
///
/// # Example
///
/// ```rust
/// use xconnector::build_bearer_auth_header;
///
/// let header = build_bearer_auth_header("your_bearer_token");
/// assert_eq!(header, "Bearer your_bearer_token");
/// ```
pub fn build_bearer_auth_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}

/// OAuth 1.0a signer holding the four user-context secrets.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl OAuthSigner {
    #[must_use]
    pub fn new(config: &TwitterConfig) -> Self {
        Self {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            access_token: config.access_token.clone(),
            access_token_secret: config.access_token_secret.clone(),
        }
    }

    /// Builds the OAuth 1.0a `Authorization` header value for a request.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method (GET, POST, ...)
    /// - `url`: Full URL without the query string
    /// - `params`: Query parameters; JSON bodies are not signed
    pub fn sign(&self, method: &str, url: &str, params: &[(String, String)]) -> ApiResult<String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign_with(method, url, params, &generate_nonce(), &timestamp)
    }

    /// Signs with a caller-supplied nonce and timestamp.
    pub(crate) fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> ApiResult<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.access_token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let signature = self.signature(method, url, &oauth_params, params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        oauth_params: &[(String, String)],
        params: &[(String, String)],
    ) -> ApiResult<String> {
        // Sort by encoded key, then encoded value
        let mut encoded: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.access_token_secret)
        );

        hmac_sha1(&signing_key, &base_string)
    }
}

/// Percent-encodes according to RFC 3986 (only `A-Z a-z 0-9 - . _ ~` pass through).
fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// 16 random bytes as 32 hex characters.
fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hmac_sha1(key: &str, data: &str) -> ApiResult<String> {
    type HmacSha1 = Hmac<Sha1>;

    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| ApiError::OAuth(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
