//! Individual header values as handed over by the HTTP layer.

use serde::Serialize;
use std::fmt;

/// A single header value.
///
/// HTTP stacks disagree on how they surface header values: some give text, some already
/// parsed integers, and some keep a key around with no value at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Null,
    Number(i64),
    Text(String),
}

impl HeaderValue {
    /// Null and empty text count as "not set".
    pub fn is_empty(&self) -> bool {
        match self {
            HeaderValue::Null => true,
            HeaderValue::Number(_) => false,
            HeaderValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Interprets the value as a whole number of seconds or requests.
    ///
    /// Returns `None` for empty values, negative numbers and text that is not an integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            HeaderValue::Null => None,
            HeaderValue::Number(n) => u64::try_from(*n).ok(),
            HeaderValue::Text(s) => s.trim().parse::<u64>().ok(),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Null => Ok(()),
            HeaderValue::Number(n) => write!(f, "{}", n),
            HeaderValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Number(value)
    }
}

impl From<u64> for HeaderValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => HeaderValue::Number(n),
            Err(_) => HeaderValue::Text(value.to_string()),
        }
    }
}

impl From<i32> for HeaderValue {
    fn from(value: i32) -> Self {
        HeaderValue::Number(value.into())
    }
}

impl<T: Into<HeaderValue>> From<Option<T>> for HeaderValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HeaderValue::Null, Into::into)
    }
}
