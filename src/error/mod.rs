//! The error raised for a failed API call, with its rate limit metadata.

mod kind;

use log::debug;
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::clock::{Clock, SystemClock};
use crate::headers::{
    HeaderError, Headers, IntoHeaders, RATELIMIT_LIMIT, RATELIMIT_REMAINING, RATELIMIT_RESET,
    RETRY_AFTER,
};

pub use kind::{ErrorKind, RetryStrategy};

/// A failed API response: an optional message plus the response headers.
///
/// Everything rate limit related is derived from the headers on access. Missing or empty
/// headers read as zero (or the Unix epoch), so every accessor is safe to call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: Option<String>,
    headers: Headers,
}

impl ApiError {
    /// Builds a general API error.
    ///
    /// Fails only when `headers` cannot be read as a mapping.
    pub fn new(message: Option<String>, headers: impl IntoHeaders) -> Result<Self, HeaderError> {
        Self::with_kind(ErrorKind::General, message, headers)
    }

    /// Builds the error for a 420/429 rejection, whose retry delay comes from `Retry-After`.
    pub fn rate_limit_exceeded(
        message: Option<String>,
        headers: impl IntoHeaders,
    ) -> Result<Self, HeaderError> {
        Self::with_kind(ErrorKind::RateLimitExceeded, message, headers)
    }

    pub fn with_kind(
        kind: ErrorKind,
        message: Option<String>,
        headers: impl IntoHeaders,
    ) -> Result<Self, HeaderError> {
        Ok(Self::with_headers(kind, message, headers.into_headers()?))
    }

    /// Infallible constructor for headers that are already a [`Headers`] snapshot.
    pub fn with_headers(kind: ErrorKind, message: Option<String>, headers: Headers) -> Self {
        Self {
            kind,
            message,
            headers,
        }
    }

    /// Picks the kind from the response status.
    pub fn from_status(status: StatusCode, message: Option<String>, headers: Headers) -> Self {
        Self::with_headers(ErrorKind::from_status(status), message, headers)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// When the current rate limit window resets.
    ///
    /// The epoch if the server didn't say, or sent a timestamp `SystemTime` cannot hold.
    pub fn ratelimit_reset(&self) -> SystemTime {
        let secs = self.headers.first_u64(RATELIMIT_RESET).unwrap_or(0);
        UNIX_EPOCH
            .checked_add(Duration::from_secs(secs))
            .unwrap_or_else(|| {
                debug!("Ignoring out-of-range rate limit reset {}", secs);
                UNIX_EPOCH
            })
    }

    pub fn ratelimit_limit(&self) -> u64 {
        self.headers.first_u64(RATELIMIT_LIMIT).unwrap_or(0)
    }

    pub fn ratelimit_remaining(&self) -> u64 {
        self.headers.first_u64(RATELIMIT_REMAINING).unwrap_or(0)
    }

    /// Seconds to wait before retrying, measured against the system clock.
    pub fn retry_after(&self) -> u64 {
        self.retry_after_with(&SystemClock)
    }

    /// Seconds to wait before retrying, measured against `clock`.
    ///
    /// The clock is read on every call. Never negative: a reset time in the past yields 0.
    pub fn retry_after_with<C: Clock + ?Sized>(&self, clock: &C) -> u64 {
        match self.kind.retry_strategy() {
            RetryStrategy::RetryAfterHeader => self.headers.first_u64(RETRY_AFTER).unwrap_or(0),
            RetryStrategy::ResetHeader => seconds_until(self.ratelimit_reset(), clock.now()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Captures every derived field at one instant.
    pub fn snapshot_with<C: Clock + ?Sized>(&self, clock: &C) -> RateLimitSnapshot {
        RateLimitSnapshot {
            kind: self.kind,
            message: self.message.clone(),
            limit: self.ratelimit_limit(),
            remaining: self.ratelimit_remaining(),
            reset: unix_secs(self.ratelimit_reset()),
            retry_after: self.retry_after_with(clock),
            retryable: self.is_retryable(),
        }
    }
}

/// Whole seconds from `now` until `deadline`, rounded up. Zero once the deadline has passed.
fn seconds_until(deadline: SystemTime, now: SystemTime) -> u64 {
    match deadline.duration_since(now) {
        Ok(remaining) => remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0),
        Err(_) => 0,
    }
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message.as_deref() {
            Some(msg) if !msg.is_empty() => write!(f, "{}", msg),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ApiError {}

/// The derived fields of an [`ApiError`], as reported to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    pub kind: ErrorKind,
    pub message: Option<String>,
    pub limit: u64,
    pub remaining: u64,
    /// Unix seconds.
    pub reset: u64,
    pub retry_after: u64,
    pub retryable: bool,
}
