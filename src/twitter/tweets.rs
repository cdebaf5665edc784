//! Tweet operations for Twitter API.
//!
//! This module contains the call that publishes a tweet using the Twitter
//! API v2.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

use super::api::{sanitize_for_logging, TwitterClient, TwitterResponse};

/// Body of `POST /2/tweets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest<'a> {
    pub text: &'a str,
}

/// The tweet Twitter created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    pub text: String,
}

/// Posts a tweet to Twitter/X using the API v2 endpoint.
///
/// The request is signed with the OAuth 1.0a user-context credentials.
/// The text is sent as given; length handling is up to the caller.
///
/// Any 2xx status means the tweet exists. If that response carries no
/// readable tweet object the call still succeeds, returning `Ok(None)`.
///
/// # Errors
///
/// This function can fail for several reasons:
/// - Invalid Twitter API credentials
/// - Network connectivity issues
/// - Twitter API rate limiting beyond the configured policy
/// - Twitter rejecting the content (duplicate, too long, ...)
pub(crate) async fn create_tweet(
    client: &TwitterClient,
    text: &str,
) -> ApiResult<Option<CreatedTweet>> {
    info!(
        "Starting tweet post operation for text: '{}'",
        sanitize_for_logging(text, 80)
    );

    let payload = CreateTweetRequest { text };
    debug!("Tweet payload: {}", serde_json::to_string(&payload)?);

    let body = client.post_json("2/tweets", &payload, "post_tweet").await?;

    match serde_json::from_slice::<TwitterResponse<CreatedTweet>>(&body) {
        Ok(TwitterResponse {
            data: Some(tweet), ..
        }) => {
            info!("Tweet posted with id {}", tweet.id);
            Ok(Some(tweet))
        }
        Ok(_) => {
            warn!("Tweet accepted but the response carried no tweet data");
            Ok(None)
        }
        Err(e) => {
            warn!(
                "Tweet accepted but the response could not be decoded: {} (body: '{}')",
                e,
                sanitize_for_logging(&String::from_utf8_lossy(&body), 200)
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_tweet_response() {
        let response: TwitterResponse<CreatedTweet> = serde_json::from_str(
            r#"{"data":{"id":"1445880548472328192","text":"hello","edit_history_tweet_ids":["1445880548472328192"]}}"#,
        )
        .unwrap();
        assert_eq!(response.data.unwrap().id, "1445880548472328192");
    }
}
