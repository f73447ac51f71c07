//! Error type for failed API calls, with rate limit metadata read from response headers.
//!
//! ```
//! use api_error::ApiError;
//!
//! let error = ApiError::rate_limit_exceeded(None, [("retry-after", 12), ("Retry-After", 13)])?;
//! assert_eq!(error.retry_after(), 12);
//! # Ok::<(), api_error::HeaderError>(())
//! ```

pub mod clock;
pub mod commands;
pub mod error;
pub mod headers;
pub mod http;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ApiError, ErrorKind, RateLimitSnapshot, RetryStrategy};
pub use headers::{HeaderError, HeaderValue, Headers, IntoHeaders};
