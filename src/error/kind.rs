//! Classification of failed responses by HTTP status.

use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;

/// How a variant works out its retry delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Seconds until the `x-ratelimit-reset` timestamp.
    ResetHeader,
    /// The `retry-after` header, taken as is.
    RetryAfterHeader,
}

/// The kind of API failure an [`crate::ApiError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Any failure without a more specific kind.
    General,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    NotAcceptable,
    /// HTTP 420 "Enhance Your Calm" or 429 "Too Many Requests".
    RateLimitExceeded,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
}

impl ErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            406 => ErrorKind::NotAcceptable,
            420 | 429 => ErrorKind::RateLimitExceeded,
            500 => ErrorKind::InternalServerError,
            502 => ErrorKind::BadGateway,
            503 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::General,
        }
    }

    pub fn retry_strategy(self) -> RetryStrategy {
        match self {
            ErrorKind::RateLimitExceeded => RetryStrategy::RetryAfterHeader,
            _ => RetryStrategy::ResetHeader,
        }
    }

    /// Rate limits and server-side failures may succeed later; client errors won't.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimitExceeded
                | ErrorKind::InternalServerError
                | ErrorKind::BadGateway
                | ErrorKind::ServiceUnavailable
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::General => "API request failed",
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not found",
            ErrorKind::NotAcceptable => "Not acceptable",
            ErrorKind::RateLimitExceeded => "Rate limit exceeded",
            ErrorKind::InternalServerError => "Internal server error",
            ErrorKind::BadGateway => "Bad gateway",
            ErrorKind::ServiceUnavailable => "Service unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
