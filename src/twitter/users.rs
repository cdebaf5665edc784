//! User lookups for the Twitter API.
//!
//! This module covers the authenticated "who am I" lookup performed when the
//! connector starts, and lookups of other accounts by username.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

use super::api::{ApiProblem, Auth, TwitterClient, TwitterResponse};

const USER_FIELDS: &str = "id,name,username,created_at";

/// A Twitter user object as returned by the v2 API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Numeric user id, encoded as a string by the API
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn user_fields() -> Vec<(String, String)> {
    vec![("user.fields".to_string(), USER_FIELDS.to_string())]
}

/// Fetches the user that owns the access token.
pub(crate) async fn get_me(client: &TwitterClient) -> ApiResult<User> {
    info!("Looking up authenticated user");

    let response: TwitterResponse<User> = client
        .get_json(Auth::User, "2/users/me", &user_fields(), "get_me")
        .await?;

    response.data.ok_or_else(|| {
        let detail = response
            .errors
            .first()
            .and_then(ApiProblem::message)
            .unwrap_or_else(|| "no user data in response".to_string());
        ApiError::UnexpectedResponse(detail)
    })
}

/// Looks up a user by username using the Twitter API v2.
///
/// Uses the bearer token when one is configured and falls back to the
/// user-context credentials otherwise.
///
/// # Returns
///
/// - `Ok(Some(User))`: If the user exists
/// - `Ok(None)`: If Twitter reports no such user
/// - `Err(ApiError)`: If the request fails
pub(crate) async fn get_user_by_username(
    client: &TwitterClient,
    username: &str,
) -> ApiResult<Option<User>> {
    let username = username.trim_start_matches('@');
    info!("Looking up user by username: {}", username);

    let auth = if client.has_bearer_token() {
        Auth::App
    } else {
        Auth::User
    };
    let path = format!("2/users/by/username/{}", urlencoding::encode(username));

    let response: TwitterResponse<User> = client
        .get_json(auth, &path, &user_fields(), "lookup_user")
        .await?;

    match response.data {
        Some(user) => {
            info!("Found user {}: {} (@{})", user.id, user.name, user.username);
            Ok(Some(user))
        }
        None => {
            warn!("User {} not found", username);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_with_optional_created_at() {
        let response: TwitterResponse<User> = serde_json::from_str(
            r#"{"data":{"id":"2244994945","name":"Twitter Dev","username":"TwitterDev","created_at":"2013-12-14T04:35:55.000Z"}}"#,
        )
        .unwrap();
        let user = response.data.unwrap();
        assert_eq!(user.id, "2244994945");
        assert_eq!(user.username, "TwitterDev");
        assert!(user.created_at.is_some());

        let bare: User =
            serde_json::from_str(r#"{"id":"1","name":"n","username":"u"}"#).unwrap();
        assert_eq!(bare.created_at, None);
    }

    #[test]
    fn test_missing_user_response() {
        let response: TwitterResponse<User> = serde_json::from_str(
            r#"{"errors":[{"title":"Not Found Error","detail":"Could not find user with username: [nobody]."}]}"#,
        )
        .unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
    }
}
