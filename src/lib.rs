//! # xconnector
//!
//! A small Twitter/X connector for AI agents. It authenticates once with
//! OAuth 1.0a user-context credentials, remembers which account it is
//! posting as, and exposes a single `post` operation.
//!
//! ## Features
//!
//! - OAuth 1.0a (HMAC-SHA1) request signing for Twitter/X API v2
//! - One-time identity lookup (`GET /2/users/me`) at construction
//! - Posting with silent truncation to the 280 character limit
//! - Typed post errors that callers can branch on
//! - Bounded, observable wait-and-retry on rate limits
//! - Structured logging through the `log` facade
//!
//! ## Configuration
//!
//! The connector takes a [`TwitterConfig`]. [`TwitterConfig::from_env`] reads:
//! - `TWITTER_API_KEY`, `TWITTER_API_KEY_SECRET`: consumer credentials (required)
//! - `TWITTER_ACCESS_TOKEN`, `TWITTER_ACCESS_TOKEN_SECRET`: user credentials (required)
//! - `TWITTER_BEARER_TOKEN`: app-only token (optional)
//! - `TWITTER_API_URL`: API base URL override (optional)

pub mod config;
pub mod connector;
pub mod error;
pub mod oauth;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::TwitterConfig;
pub use connector::{truncate_message, BotIdentity, PostedTweet, TwitterConnector, MAX_TWEET_CHARS};
pub use error::{ApiError, ConfigError, ConnectError, MentionsError, PostError, PostErrorKind};
pub use oauth::build_bearer_auth_header;
pub use twitter::{RateLimitNotice, RateLimitPolicy, TwitterApi, TwitterClient};
