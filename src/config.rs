//! Configuration module for the Twitter/X connector.
//!
//! This module contains the credential set and client settings for the
//! Twitter/X API integration. The connector takes a [`TwitterConfig`] value;
//! reading it from the process environment is left to the caller through
//! [`TwitterConfig::from_env`].

use log::{debug, error, info, warn};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::twitter::RateLimitPolicy;

/// Environment variable holding the OAuth 1.0a consumer key.
pub const API_KEY_VAR: &str = "TWITTER_API_KEY";
/// Environment variable holding the OAuth 1.0a consumer secret.
pub const API_KEY_SECRET_VAR: &str = "TWITTER_API_KEY_SECRET";
/// Environment variable holding the OAuth 1.0a access token.
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
/// Environment variable holding the OAuth 1.0a access token secret.
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";
/// Environment variable holding the optional app-only bearer token.
pub const BEARER_TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";
/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "TWITTER_API_URL";

/// Configuration struct for Twitter/X API credentials.
///
/// Holds the four OAuth 1.0a secrets used to sign user-context requests
/// (identity lookup, posting tweets), the optional app-only bearer token,
/// and transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    /// OAuth 1.0a Consumer Key (API Key)
    pub consumer_key: String,
    /// OAuth 1.0a Consumer Secret (API Key Secret)
    pub consumer_secret: String,
    /// OAuth 1.0a Access Token
    pub access_token: String,
    /// OAuth 1.0a Access Token Secret
    pub access_token_secret: String,
    /// OAuth 2.0 Bearer Token for app-only read access
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Base URL for the Twitter API v2
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// How long to wait out rate limits before giving up
    #[serde(default)]
    pub rate_limit: RateLimitPolicy,
}

fn default_api_url() -> String {
    "https://api.x.com".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

pub(crate) mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            access_token: String::new(),
            access_token_secret: String::new(),
            bearer_token: None,
            api_url: default_api_url(),
            timeout: default_timeout(),
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

/// Masks a secret for logging, keeping at most the first and last 8 characters.
///
/// Short secrets keep less so that the masked form never reveals more than
/// half of the value.
pub(crate) fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();

    let prefix: String = if len > 16 {
        chars[..8].iter().collect()
    } else {
        chars[..len / 2].iter().collect()
    };
    let suffix: String = if len > 16 {
        chars[len - 8..].iter().collect()
    } else {
        String::new()
    };

    format!("{}...{}", prefix, suffix)
}

/// Reads a required credential, logging its masked form.
///
/// Unset and empty variables are both treated as missing.
fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => {
            info!(
                "Found {} environment variable with length: {}",
                name,
                value.len()
            );
            debug!("{} (masked): {}", name, mask_secret(&value));
            Ok(value)
        }
        Ok(_) => {
            error!("{} environment variable is empty", name);
            Err(ConfigError::MissingCredential(name))
        }
        Err(e) => {
            error!("Failed to load {} from environment: {}", name, e);
            Err(ConfigError::MissingCredential(name))
        }
    }
}

impl TwitterConfig {
    /// Builds a config from the four OAuth 1.0a secrets with default settings.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }

    /// Creates a new `TwitterConfig` by loading credentials from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `TWITTER_API_KEY`: consumer key
    /// - `TWITTER_API_KEY_SECRET`: consumer secret
    /// - `TWITTER_ACCESS_TOKEN`: access token
    /// - `TWITTER_ACCESS_TOKEN_SECRET`: access token secret
    ///
    /// # Optional Environment Variables
    ///
    /// - `TWITTER_BEARER_TOKEN`: app-only bearer token
    /// - `TWITTER_API_URL`: API base URL (defaults to `https://api.x.com`)
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterConfig)`: If all required variables are present and non-empty
    /// - `Err(ConfigError::MissingCredential)`: Naming the first missing variable
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use xconnector::TwitterConfig;
    ///
    /// let config = TwitterConfig::from_env().expect("Twitter credentials");
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading Twitter configuration from environment variables");

        let mut config = TwitterConfig::new(
            required_var(API_KEY_VAR)?,
            required_var(API_KEY_SECRET_VAR)?,
            required_var(ACCESS_TOKEN_VAR)?,
            required_var(ACCESS_TOKEN_SECRET_VAR)?,
        );

        match env::var(BEARER_TOKEN_VAR) {
            Ok(token) if !token.is_empty() => {
                info!("Found {} environment variable", BEARER_TOKEN_VAR);
                debug!("Bearer token (masked): {}", mask_secret(&token));
                config.bearer_token = Some(token);
            }
            _ => {
                info!(
                    "No {} found in environment variables - app-only access disabled",
                    BEARER_TOKEN_VAR
                );
            }
        }

        if let Ok(url) = env::var(API_URL_VAR) {
            if !url.is_empty() {
                warn!("Using non-default Twitter API URL: {}", url);
                config.api_url = url;
            }
        }

        info!("Twitter configuration loaded successfully");
        Ok(config)
    }

    /// Checks that all four OAuth 1.0a secrets are present.
    ///
    /// Returns the first missing credential so the error names something the
    /// operator can fix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            (API_KEY_VAR, &self.consumer_key),
            (API_KEY_SECRET_VAR, &self.consumer_secret),
            (ACCESS_TOKEN_VAR, &self.access_token),
            (ACCESS_TOKEN_SECRET_VAR, &self.access_token_secret),
        ];

        for (name, value) in required {
            if value.is_empty() {
                error!("Twitter API credential {} is not set", name);
                return Err(ConfigError::MissingCredential(name));
            }
        }

        if self.bearer_token.as_deref() == Some("") {
            warn!("Bearer token is empty, app-only access will be disabled");
        }

        Ok(())
    }

    /// The bearer token, if one was configured and is non-empty.
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref().filter(|t| !t.is_empty())
    }
}
