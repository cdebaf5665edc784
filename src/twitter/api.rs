//! Core Twitter API utilities.
//!
//! This module contains the HTTP client used for every Twitter API call. It
//! signs user-context requests with OAuth 1.0a, waits out rate limits
//! according to the configured policy and decodes error responses.

use log::{debug, error, info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::config::TwitterConfig;
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::oauth::{build_bearer_auth_header, OAuthSigner};

use super::rate_limit::{RateLimitHook, RateLimitInfo, RateLimitNotice, RateLimitPolicy};

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let head: String = sanitized.chars().take(max_len).collect();
        format!("{}... [truncated, {} total bytes]", head, text.len())
    } else {
        sanitized
    }
}

/// Standard Twitter API v2 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

/// An entry of the `errors` array, or a top-level problem document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiProblem {
    pub(crate) fn message(&self) -> Option<String> {
        self.detail.clone().or_else(|| self.title.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(flatten)]
    problem: ApiProblem,
    #[serde(default)]
    errors: Vec<ApiProblem>,
}

/// How a request proves who is making it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// OAuth 1.0a user context
    User,
    /// OAuth 2.0 bearer token, app-only
    App,
}

/// Twitter REST API v2 client.
#[derive(Clone)]
pub struct TwitterClient {
    http: Client,
    base_url: Url,
    signer: OAuthSigner,
    bearer_token: Option<String>,
    rate_limit: RateLimitPolicy,
    rate_limit_hook: Option<RateLimitHook>,
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_bearer_token", &self.bearer_token.is_some())
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl TwitterClient {
    /// Builds a client from a validated configuration.
    pub fn new(config: &TwitterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("xconnector/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::HttpClient)?;

        let mut base_url = Url::parse(&config.api_url)?;
        // Endpoints are joined relative to the base, so its path must be a directory
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        debug!("Twitter API base URL: {}", base_url);

        Ok(Self {
            http,
            base_url,
            signer: OAuthSigner::new(config),
            bearer_token: config.bearer_token().map(str::to_string),
            rate_limit: config.rate_limit.clone(),
            rate_limit_hook: None,
        })
    }

    /// Registers an observer that is called before every rate limit wait.
    #[must_use]
    pub fn with_rate_limit_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RateLimitNotice) + Send + Sync + 'static,
    {
        self.rate_limit_hook = Some(Arc::new(hook));
        self
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Sends a GET request and decodes the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        auth: Auth,
        path: &str,
        params: &[(String, String)],
        operation_name: &str,
    ) -> ApiResult<T> {
        let body = self
            .send(Method::GET, auth, path, params, None::<&()>, operation_name)
            .await?;
        decode_json(&body, operation_name)
    }

    /// Sends a user-context POST with a JSON body.
    ///
    /// Returns the raw body of the 2xx response; decoding it is up to the caller.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation_name: &str,
    ) -> ApiResult<Vec<u8>> {
        self.send(Method::POST, Auth::User, path, &[], Some(body), operation_name)
            .await
    }

    /// Resolves an endpoint path beneath the base URL, keeping any path prefix
    /// the base carries.
    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorization(
        &self,
        auth: Auth,
        method: &Method,
        endpoint: &Url,
        params: &[(String, String)],
    ) -> ApiResult<String> {
        match auth {
            Auth::User => self.signer.sign(method.as_str(), endpoint.as_str(), params),
            Auth::App => self
                .bearer_token
                .as_deref()
                .map(build_bearer_auth_header)
                .ok_or_else(|| ApiError::OAuth("Bearer token required for app-only auth".into())),
        }
    }

    /// Makes an authenticated request, waiting out rate limits per the policy.
    ///
    /// Returns the body of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        auth: Auth,
        path: &str,
        params: &[(String, String)],
        body: Option<&B>,
        operation_name: &str,
    ) -> ApiResult<Vec<u8>> {
        let endpoint = self.endpoint(path)?;
        info!(
            "Making authenticated request for operation: {}",
            operation_name
        );
        debug!("Request: {} {}", method, endpoint);

        let mut attempt = 0;
        loop {
            attempt += 1;

            // Signed per attempt so every retry gets a fresh nonce and timestamp
            let auth_header = self.authorization(auth, &method, &endpoint, params)?;
            let mut request = self
                .http
                .request(method.clone(), endpoint.clone())
                .header(AUTHORIZATION, auth_header);
            if !params.is_empty() {
                request = request.query(params);
            }
            if let Some(body) = body {
                request = request.header(CONTENT_TYPE, "application/json").json(body);
            }

            let response = request.send().await.map_err(|e| {
                error!("Request for operation '{}' failed: {}", operation_name, e);
                ApiError::from(e)
            })?;

            let status = response.status();
            info!(
                "Received response with status: {} for operation: {}",
                status, operation_name
            );

            if status != StatusCode::TOO_MANY_REQUESTS {
                return self.handle_response(response, operation_name).await;
            }

            let limits = RateLimitInfo::from_headers(response.headers());
            match self.rate_limit.wait_for(attempt, &limits) {
                Some(wait) => {
                    warn!(
                        "Rate limited on operation '{}' (attempt {}), retrying in {}s",
                        operation_name,
                        attempt,
                        wait.as_secs()
                    );
                    if let Some(hook) = &self.rate_limit_hook {
                        hook(&RateLimitNotice {
                            operation: operation_name.to_string(),
                            attempt,
                            wait,
                        });
                    }
                    tokio::time::sleep(wait).await;
                }
                None => {
                    let retry_after = limits.wait_hint().unwrap_or(self.rate_limit.default_wait);
                    error!(
                        "Rate limited on operation '{}' after {} attempt(s), giving up (reset in {}s)",
                        operation_name,
                        attempt,
                        retry_after.as_secs()
                    );
                    return Err(ApiError::RateLimited { retry_after });
                }
            }
        }
    }

    async fn handle_response(
        &self,
        response: Response,
        operation_name: &str,
    ) -> ApiResult<Vec<u8>> {
        let status = response.status();
        let limits = RateLimitInfo::from_headers(response.headers());
        if limits.is_exhausted() {
            debug!(
                "Rate limit window exhausted after operation '{}', resets at {:?}",
                operation_name, limits.reset
            );
        }

        let bytes = response.bytes().await?;

        if status.is_success() {
            info!("Operation '{}' completed successfully", operation_name);
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                bytes.len()
            );
            return Ok(bytes.to_vec());
        }

        error!("Operation '{}' failed - Status: {}", operation_name, status);
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&String::from_utf8_lossy(&bytes), 200)
        );

        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        let message = body
            .problem
            .message()
            .or_else(|| body.errors.iter().find_map(ApiProblem::message))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Decodes the JSON body of a successful response.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8], operation_name: &str) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        error!(
            "Failed to decode response for operation '{}': {}",
            operation_name, e
        );
        debug!(
            "Undecodable response for '{}': {}",
            operation_name,
            sanitize_for_logging(&String::from_utf8_lossy(body), 200)
        );
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging("line1\nline2\tx", 100), "line1 line2 x");
        assert_eq!(sanitize_for_logging("bell\u{7}", 100), "bell?");

        let long = "é".repeat(10);
        let sanitized = sanitize_for_logging(&long, 4);
        assert!(sanitized.starts_with("éééé..."));
        assert!(sanitized.contains("20 total bytes"));
    }

    #[test]
    fn test_error_body_prefers_detail() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"title":"Forbidden","detail":"You are not permitted to perform this action.","type":"about:blank","status":403}"#,
        )
        .unwrap();
        assert_eq!(
            body.problem.message().as_deref(),
            Some("You are not permitted to perform this action.")
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let config = TwitterConfig::new("key", "secret", "token", "token_secret")
            .with_api_url("https://proxy.example.com/twitter");
        let client = TwitterClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint("/2/users/me").unwrap().as_str(),
            "https://proxy.example.com/twitter/2/users/me"
        );
        assert_eq!(
            client.endpoint("2/tweets").unwrap().as_str(),
            "https://proxy.example.com/twitter/2/tweets"
        );

        let root = TwitterClient::new(&config.with_api_url("https://api.x.com")).unwrap();
        assert_eq!(
            root.endpoint("/2/tweets").unwrap().as_str(),
            "https://api.x.com/2/tweets"
        );
    }

    #[test]
    fn test_client_rejects_missing_credentials() {
        let config = TwitterConfig::new("key", "", "token", "token_secret");
        assert!(matches!(
            TwitterClient::new(&config),
            Err(ConfigError::MissingCredential("TWITTER_API_KEY_SECRET"))
        ));
    }
}
