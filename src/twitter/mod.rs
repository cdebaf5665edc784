//! Twitter/X API integration module.
//!
//! This module contains the HTTP client for the Twitter/X API v2 and the
//! [`TwitterApi`] trait the connector talks to, so the transport can be
//! swapped out (tests use in-memory stubs).

mod api;
mod rate_limit;
mod tweets;
mod users;

use async_trait::async_trait;

use crate::error::ApiResult;

pub use api::{ApiProblem, TwitterClient, TwitterResponse};
pub use rate_limit::{RateLimitHook, RateLimitInfo, RateLimitNotice, RateLimitPolicy};
pub use tweets::{CreateTweetRequest, CreatedTweet};
pub use users::User;

pub(crate) use api::sanitize_for_logging;

/// The Twitter operations the connector needs.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// "Who am I": the account the credentials belong to.
    async fn get_me(&self) -> ApiResult<User>;

    /// Looks up another account; `Ok(None)` if it does not exist.
    async fn get_user_by_username(&self, username: &str) -> ApiResult<Option<User>>;

    /// Publishes a new tweet with exactly this text.
    ///
    /// `Ok(None)` means Twitter accepted the tweet without describing it.
    async fn create_tweet(&self, text: &str) -> ApiResult<Option<CreatedTweet>>;
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn get_me(&self) -> ApiResult<User> {
        users::get_me(self).await
    }

    async fn get_user_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        users::get_user_by_username(self, username).await
    }

    async fn create_tweet(&self, text: &str) -> ApiResult<Option<CreatedTweet>> {
        tweets::create_tweet(self, text).await
    }
}
