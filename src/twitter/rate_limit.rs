//! Rate limit handling for Twitter API requests.
//!
//! Twitter reports its limits in `x-rate-limit-*` response headers and answers
//! with 429 once a window is exhausted. The client waits those out according
//! to a bounded [`RateLimitPolicy`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::Deserialize;

/// How the client waits out 429 responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitPolicy {
    /// Total attempts per request, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Longest single wait the client will sit through
    #[serde(default = "default_max_wait", with = "crate::config::duration_secs")]
    pub max_wait: Duration,

    /// Wait used when the response carries no reset information
    #[serde(default = "default_wait", with = "crate::config::duration_secs")]
    pub default_wait: Duration,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_wait() -> Duration {
    // One full Twitter rate limit window
    Duration::from_secs(15 * 60)
}

fn default_wait() -> Duration {
    Duration::from_secs(60)
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            max_wait: default_max_wait(),
            default_wait: default_wait(),
        }
    }
}

impl RateLimitPolicy {
    /// A policy that surfaces the first 429 without waiting.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Decides whether to wait after a 429 on the given attempt (1-based).
    ///
    /// Returns the wait to sleep through, or `None` if the caller should give up.
    #[must_use]
    pub fn wait_for(&self, attempt: u32, info: &RateLimitInfo) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let wait = info.wait_hint().unwrap_or(self.default_wait);
        (wait <= self.max_wait).then_some(wait)
    }
}

/// Rate limit information from Twitter API headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum number of requests allowed in the window
    pub limit: Option<u32>,
    /// Remaining requests in the current window
    pub remaining: Option<u32>,
    /// Unix timestamp when the window resets
    pub reset: Option<i64>,
    /// `retry-after` header, in seconds
    pub retry_after: Option<u64>,
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_value(headers, "x-rate-limit-limit"),
            remaining: header_value(headers, "x-rate-limit-remaining"),
            reset: header_value(headers, "x-rate-limit-reset"),
            retry_after: header_value(headers, "retry-after"),
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Time until the window resets, relative to `now` (Unix seconds).
    #[must_use]
    pub fn time_until_reset_from(&self, now: i64) -> Option<Duration> {
        let reset = self.reset?;
        (reset > now).then(|| Duration::from_secs((reset - now) as u64))
    }

    #[must_use]
    pub fn time_until_reset(&self) -> Option<Duration> {
        self.time_until_reset_from(chrono::Utc::now().timestamp())
    }

    /// The wait the platform asked for, preferring `retry-after`.
    #[must_use]
    pub fn wait_hint(&self) -> Option<Duration> {
        self.retry_after
            .map(Duration::from_secs)
            .or_else(|| self.time_until_reset())
    }
}

/// Emitted each time the client is about to wait out a rate limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitNotice {
    pub operation: String,
    /// The attempt that was rate limited (1-based)
    pub attempt: u32,
    pub wait: Duration,
}

/// Observer invoked before every rate limit wait.
pub type RateLimitHook = Arc<dyn Fn(&RateLimitNotice) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-rate-limit-limit", HeaderValue::from_static("300"));
        headers.insert("x-rate-limit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-rate-limit-reset", HeaderValue::from_static("1700000900"));

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.limit, Some(300));
        assert!(info.is_exhausted());
        assert_eq!(
            info.time_until_reset_from(1_700_000_000),
            Some(Duration::from_secs(900))
        );
        assert_eq!(info.time_until_reset_from(1_800_000_000), None);
    }

    #[test]
    fn test_policy_prefers_retry_after_and_respects_bounds() {
        let policy = RateLimitPolicy {
            max_attempts: 2,
            max_wait: Duration::from_secs(10),
            default_wait: Duration::from_secs(5),
        };

        let hinted = RateLimitInfo {
            retry_after: Some(3),
            ..Default::default()
        };
        assert_eq!(policy.wait_for(1, &hinted), Some(Duration::from_secs(3)));
        assert_eq!(policy.wait_for(2, &hinted), None);

        assert_eq!(
            policy.wait_for(1, &RateLimitInfo::default()),
            Some(Duration::from_secs(5))
        );

        let too_long = RateLimitInfo {
            retry_after: Some(60),
            ..Default::default()
        };
        assert_eq!(policy.wait_for(1, &too_long), None);
    }

    #[test]
    fn test_no_retry_policy() {
        let info = RateLimitInfo {
            retry_after: Some(1),
            ..Default::default()
        };
        assert_eq!(RateLimitPolicy::no_retry().wait_for(1, &info), None);
    }
}
