//! Error types for the Twitter/X connector.
//!
//! Errors are split by where they can happen: configuration problems and
//! failed authentication stop construction, [`ApiError`] covers a single HTTP
//! exchange, and [`PostError`] is what callers of
//! [`TwitterConnector::post`](crate::connector::TwitterConnector::post) see.

use std::time::Duration;

use thiserror::Error;

/// Configuration errors detected before any network call is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required OAuth 1.0a credential is missing or empty
    #[error("Twitter API credential {0} is not set")]
    MissingCredential(&'static str),

    /// The API base URL could not be parsed
    #[error("Invalid Twitter API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors from a single Twitter API exchange.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint URL could not be built
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// OAuth signature generation failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Twitter returned a non-success status
    #[error("Twitter API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Still rate limited after the retry policy gave up
    #[error("Rate limited, retry after {} seconds", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// The response was well-formed JSON but missing required data
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    /// Whether the platform rejected our credentials.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == 401 || *status == 403)
            || matches!(self, Self::OAuth(_))
    }
}

/// Errors that abort [`TwitterConnector::connect`](crate::connector::TwitterConnector::connect).
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The identity lookup failed
    #[error("Twitter authentication failed: {0}")]
    Authentication(#[source] ApiError),
}

/// Fieldless view of [`PostError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostErrorKind {
    EmptyMessage,
    AuthenticationFailed,
    NetworkError,
    PlatformRejected,
    RateLimited,
    InvalidRequest,
}

/// Why a post did not go out.
///
/// The `Display` output keeps the `Error: ` / `Error posting tweet: ` prefixes
/// so the value can be handed to an agent as plain text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("Error: Tweet message is empty")]
    EmptyMessage,

    #[error("Error posting tweet: {message}")]
    AuthenticationFailed { message: String },

    #[error("Error posting tweet: {message}")]
    NetworkError { message: String },

    #[error("Error posting tweet: {message}")]
    PlatformRejected { status: Option<u16>, message: String },

    #[error("Error posting tweet: rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// The request could not be built, so nothing reached Twitter
    #[error("Error posting tweet: {message}")]
    InvalidRequest { message: String },
}

impl PostError {
    #[must_use]
    pub fn kind(&self) -> PostErrorKind {
        match self {
            Self::EmptyMessage => PostErrorKind::EmptyMessage,
            Self::AuthenticationFailed { .. } => PostErrorKind::AuthenticationFailed,
            Self::NetworkError { .. } => PostErrorKind::NetworkError,
            Self::PlatformRejected { .. } => PostErrorKind::PlatformRejected,
            Self::RateLimited { .. } => PostErrorKind::RateLimited,
            Self::InvalidRequest { .. } => PostErrorKind::InvalidRequest,
        }
    }
}

impl From<ApiError> for PostError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        if err.is_auth_failure() {
            return Self::AuthenticationFailed { message };
        }
        match err {
            ApiError::Http(_) => Self::NetworkError { message },
            ApiError::Api { status, .. } => Self::PlatformRejected {
                status: Some(status),
                message,
            },
            ApiError::RateLimited { retry_after } => Self::RateLimited {
                retry_after_secs: retry_after.as_secs(),
            },
            ApiError::Json(_) | ApiError::Url(_) => Self::InvalidRequest { message },
            ApiError::OAuth(_) | ApiError::UnexpectedResponse(_) => Self::PlatformRejected {
                status: None,
                message,
            },
        }
    }
}

/// Errors from the mention-handling operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MentionsError {
    /// Mention polling and streaming are not implemented yet
    #[error("Mention polling is not implemented")]
    Unimplemented,
}

/// Result type for Twitter API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_failures_are_not_platform_rejections() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err = PostError::from(ApiError::from(url_err));
        assert_eq!(err.kind(), PostErrorKind::InvalidRequest);
        assert!(err.to_string().starts_with("Error posting tweet: URL error"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PostError::from(ApiError::from(json_err));
        assert_eq!(err.kind(), PostErrorKind::InvalidRequest);
    }

    #[test]
    fn test_platform_failures_keep_status() {
        let err = PostError::from(ApiError::Api {
            status: 400,
            message: "duplicate content".to_string(),
        });
        assert_eq!(
            err,
            PostError::PlatformRejected {
                status: Some(400),
                message: "Twitter API error 400: duplicate content".to_string(),
            }
        );

        let err = PostError::from(ApiError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        });
        assert_eq!(err.kind(), PostErrorKind::AuthenticationFailed);
    }
}
