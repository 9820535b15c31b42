//! Bounded-retry GET with terminal-failure classification.
//!
//! A GET is attempted up to `retries + 1` times. Status 200 is success.
//! Statuses 408, 500, 502, 503 and 504, as well as timed-out attempts, are
//! retried immediately while attempts remain. Anything else, or the outcome
//! of the last attempt, is final and classified:
//!
//! | final status | error |
//! |---|---|
//! | `>= 500` | [`MeetupsError::MeetupDown`] |
//! | `400` with body `{"code": "limit"}` | [`MeetupsError::RateLimitExceeded`] |
//! | anything else | [`MeetupsError::BadResponse`] |

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{MeetupsError, MeetupsResult};
use crate::transport::{HttpResponse, HttpTransport};

/// Statuses that are retried while attempts remain.
pub const RETRIABLE_STATUSES: [u16; 5] = [408, 500, 502, 503, 504];

/// Media subtypes accepted as JSON.
const JSON_SUBTYPES: [&str; 2] = ["json", "javascript"];

/// Returns true if `status` is worth retrying.
pub fn is_retriable(status: u16) -> bool {
    RETRIABLE_STATUSES.contains(&status)
}

/// GETs URLs through an [`HttpTransport`], retrying transient failures.
#[derive(Clone)]
pub struct RetryClient {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    retries: u32,
}

impl std::fmt::Debug for RetryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryClient")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

impl RetryClient {
    /// Creates a retry client.
    ///
    /// `timeout` applies to each attempt separately; `retries` is the number
    /// of attempts made after the first one.
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration, retries: u32) -> Self {
        Self {
            transport,
            timeout,
            retries,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// GETs `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Everything [`RetryClient::get`] returns, plus `NotJson` when the
    /// content type is not a JSON media type and `BadJson` when the body
    /// does not parse.
    pub async fn get_json(&self, url: &Url) -> MeetupsResult<Value> {
        let response = self.get(url).await?;

        let content_type = response.content_type().unwrap_or_default().to_string();
        if !is_json_media_type(&content_type) {
            warn!(path = url.path(), content_type = %content_type, "response is not JSON");
            return Err(MeetupsError::NotJson {
                content_type,
                response,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            warn!(path = url.path(), error = %e, "response body is not valid JSON");
            MeetupsError::bad_json(e)
        })
    }

    /// GETs `url`, retrying transient failures.
    ///
    /// # Errors
    ///
    /// `MeetupDown`, `RateLimitExceeded` or `BadResponse` for a final non-200
    /// response, `Transport` when the HTTP exchange itself failed.
    pub async fn get(&self, url: &Url) -> MeetupsResult<HttpResponse> {
        let attempts = self.retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let last = attempt >= attempts;

            match self.transport.get(url, self.timeout).await {
                Ok(response) if response.status == 200 => {
                    debug!(path = url.path(), attempt, "GET succeeded");
                    return Ok(response);
                }
                Ok(response) => {
                    if last || !is_retriable(response.status) {
                        warn!(
                            path = url.path(),
                            attempt,
                            status = response.status,
                            "GET failed"
                        );
                        return Err(classify(response));
                    }
                    debug!(
                        path = url.path(),
                        attempt,
                        status = response.status,
                        "retrying after retriable status"
                    );
                }
                Err(err) if err.is_timeout() && !last => {
                    debug!(path = url.path(), attempt, "retrying after timeout");
                }
                Err(err) => {
                    warn!(path = url.path(), attempt, error = %err, "GET failed");
                    return Err(err.into());
                }
            }
        }
    }
}

/// Maps a final non-200 response to its error.
pub fn classify(response: HttpResponse) -> MeetupsError {
    if response.status >= 500 {
        return MeetupsError::MeetupDown { response };
    }
    if response.status == 400 && is_rate_limit_marker(&response.body) {
        return MeetupsError::RateLimitExceeded { response };
    }
    MeetupsError::BadResponse { response }
}

/// Looks for `{"code": "limit"}` in a 400 body.
///
/// Any failure to decode the body is ignored so it never hides the
/// original bad response.
fn is_rate_limit_marker(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|data| data.get("code").and_then(Value::as_str).map(|c| c == "limit"))
        .unwrap_or(false)
}

/// Returns true if the media subtype of `content_type` is `json` or
/// `javascript`, e.g. `application/json; charset=utf-8` or `text/javascript`.
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default();
    let Some((_, subtype)) = essence.split_once('/') else {
        return false;
    };
    let subtype = subtype.trim();
    JSON_SUBTYPES
        .iter()
        .any(|accepted| subtype.eq_ignore_ascii_case(accepted))
}
