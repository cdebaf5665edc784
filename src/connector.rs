//! The social posting connector.
//!
//! A [`TwitterConnector`] is only handed out after it has authenticated: the
//! constructor validates the credentials, resolves the bot's own account once
//! and keeps that identity for the rest of its life.

use std::borrow::Cow;
use std::fmt;

use log::{error, info, warn};

use crate::config::TwitterConfig;
use crate::error::{ApiError, ApiResult, ConnectError, MentionsError, PostError};
use crate::twitter::{sanitize_for_logging, TwitterApi, TwitterClient, User};

/// Twitter's per-tweet character limit.
pub const MAX_TWEET_CHARS: usize = 280;

const ELLIPSIS: &str = "...";

/// The account the connector is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    /// Lower-cased username, without the leading `@`
    pub username: String,
    /// Display name as Twitter reports it
    pub name: String,
}

impl TryFrom<User> for BotIdentity {
    type Error = ApiError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let id = user.id.parse::<u64>().map_err(|_| {
            ApiError::UnexpectedResponse(format!("user id '{}' is not numeric", user.id))
        })?;
        Ok(Self {
            id,
            username: user.username.to_lowercase(),
            name: user.name,
        })
    }
}

/// A tweet that went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedTweet {
    /// `None` when Twitter accepted the tweet but did not return its id
    pub id: Option<String>,
    /// The text actually sent, after truncation
    pub text: String,
}

impl fmt::Display for PostedTweet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tweeted: {}", self.text)
    }
}

/// Fits a message into a single tweet.
///
/// Messages longer than [`MAX_TWEET_CHARS`] characters keep their first 277
/// characters followed by `...`; shorter ones are returned unchanged.
pub fn truncate_message(message: &str) -> Cow<'_, str> {
    if message.chars().count() <= MAX_TWEET_CHARS {
        return Cow::Borrowed(message);
    }

    let keep = MAX_TWEET_CHARS - ELLIPSIS.len();
    let cut = message
        .char_indices()
        .nth(keep)
        .map_or(message.len(), |(idx, _)| idx);
    Cow::Owned(format!("{}{}", &message[..cut], ELLIPSIS))
}

/// Posts to Twitter/X on behalf of an agent.
///
/// # Example
///
/// ```rust,no_run
/// use xconnector::{TwitterConfig, TwitterConnector};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let connector = TwitterConnector::connect(TwitterConfig::from_env()?).await?;
///     match connector.post("Hello from Rust!").await {
///         Ok(tweet) => println!("{}", tweet),
///         Err(e) => eprintln!("{}", e),
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct TwitterConnector<A = TwitterClient> {
    api: A,
    identity: BotIdentity,
}

impl TwitterConnector<TwitterClient> {
    /// Validates the credentials, builds the HTTP client and authenticates.
    ///
    /// Missing credentials fail before any request is made.
    pub async fn connect(config: TwitterConfig) -> Result<Self, ConnectError> {
        let client = TwitterClient::new(&config)?;
        Self::with_api(client).await
    }
}

impl<A: TwitterApi> TwitterConnector<A> {
    /// Authenticates through an existing API implementation.
    pub async fn with_api(api: A) -> Result<Self, ConnectError> {
        let identity = match api.get_me().await.and_then(BotIdentity::try_from) {
            Ok(identity) => identity,
            Err(e) => {
                error!("Twitter authentication failed: {}", e);
                return Err(ConnectError::Authentication(e));
            }
        };

        info!("Successfully authenticated as @{}", identity.username);
        Ok(Self { api, identity })
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn user_id(&self) -> u64 {
        self.identity.id
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Posts `message` as a new tweet.
    ///
    /// Empty messages are refused without calling Twitter, and messages over
    /// the character limit are truncated rather than rejected. Every failure
    /// comes back as a [`PostError`]; this never panics on transport errors.
    /// Each successful call creates a new tweet, even for repeated text.
    pub async fn post(&self, message: &str) -> Result<PostedTweet, PostError> {
        if message.is_empty() {
            warn!("Refusing to post an empty tweet");
            return Err(PostError::EmptyMessage);
        }

        let text = truncate_message(message);
        if let Cow::Owned(_) = text {
            info!(
                "Tweet truncated from {} to {} characters",
                message.chars().count(),
                MAX_TWEET_CHARS
            );
        }

        match self.api.create_tweet(&text).await {
            Ok(created) => Ok(PostedTweet {
                id: created.map(|tweet| tweet.id),
                text: text.into_owned(),
            }),
            Err(e) => {
                error!(
                    "Failed to post tweet '{}': {}",
                    sanitize_for_logging(&text, 80),
                    e
                );
                Err(PostError::from(e))
            }
        }
    }

    /// Looks up another account by username.
    pub async fn lookup_user(&self, username: &str) -> ApiResult<Option<User>> {
        self.api.get_user_by_username(username).await
    }

    /// Mention polling and streaming are not implemented.
    ///
    /// Always returns [`MentionsError::Unimplemented`] without contacting
    /// Twitter.
    pub async fn poll_mentions(&self) -> Result<(), MentionsError> {
        warn!(
            "Mention polling requested for @{} but is not implemented",
            self.identity.username
        );
        Err(MentionsError::Unimplemented)
    }
}
