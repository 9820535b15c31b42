//! Error types for Meetup.com API operations.
//!
//! Every failed call produces exactly one [`MeetupsError`]. Retries happen
//! before an error is raised, so the error always describes the final
//! attempt. `NotJson`, `BadJson` and `BadResponse` together form the "bad
//! response" family; see [`MeetupsError::is_bad_response`].

use std::fmt;

use thiserror::Error;

use crate::transport::{HttpResponse, TransportError};

/// The category of a [`MeetupsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A media type other than JSON was returned.
    NotJson,
    /// The body claimed to be JSON but could not be parsed.
    BadJson,
    /// A terminal non-200 status that is neither a server error nor a rate limit.
    BadResponse,
    /// A server error status (5xx) was returned.
    MeetupDown,
    /// The rate limit for the API key was exceeded.
    RateLimitExceeded,
    /// The HTTP exchange itself failed.
    Transport,
}

impl ErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotJson => "not_json",
            Self::BadJson => "bad_json",
            Self::BadResponse => "bad_response",
            Self::MeetupDown => "meetup_down",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the Meetup.com API.
#[derive(Debug, Error)]
pub enum MeetupsError {
    /// Expected `application/json` or `text/javascript`, got something else.
    #[error("expected a JSON response, got content type {content_type:?}")]
    NotJson {
        content_type: String,
        response: HttpResponse,
    },

    /// The response data could not be parsed as JSON, or did not have the
    /// shape the API contract promises.
    #[error("response is not valid JSON: {source}")]
    BadJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("bad response from Meetup.com (HTTP {})", .response.status)]
    BadResponse { response: HttpResponse },

    #[error("Meetup.com is down (HTTP {})", .response.status)]
    MeetupDown { response: HttpResponse },

    /// The rate limit for the API key has been exceeded.
    #[error("Meetup.com rate limit exceeded")]
    RateLimitExceeded { response: HttpResponse },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl MeetupsError {
    /// Returns the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotJson { .. } => ErrorCode::NotJson,
            Self::BadJson { .. } => ErrorCode::BadJson,
            Self::BadResponse { .. } => ErrorCode::BadResponse,
            Self::MeetupDown { .. } => ErrorCode::MeetupDown,
            Self::RateLimitExceeded { .. } => ErrorCode::RateLimitExceeded,
            Self::Transport(_) => ErrorCode::Transport,
        }
    }

    /// Returns true for the "bad response" family: `NotJson`, `BadJson` and
    /// `BadResponse`.
    pub fn is_bad_response(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::NotJson | ErrorCode::BadJson | ErrorCode::BadResponse
        )
    }

    /// Returns the final HTTP response, if the error carries one.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::NotJson { response, .. }
            | Self::BadResponse { response }
            | Self::MeetupDown { response }
            | Self::RateLimitExceeded { response } => Some(response),
            Self::BadJson { .. } | Self::Transport(_) => None,
        }
    }

    /// Returns the HTTP status of the final response, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub(crate) fn bad_json(source: serde_json::Error) -> Self {
        Self::BadJson { source }
    }
}

/// A specialized Result type for Meetup.com API operations.
pub type MeetupsResult<T> = Result<T, MeetupsError>;
