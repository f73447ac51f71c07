//! Response header snapshot and the conversions that build it.
//!
//! Header names are kept exactly as the HTTP layer produced them. Real stacks emit both
//! `x-ratelimit-reset` and `X-RateLimit-Reset` in the same response, so lookups go through
//! [`Headers::first_present`] with an ordered list of candidate spellings.

mod value;

use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub use value::HeaderValue;

/// Candidate spellings for the rate limit reset timestamp, in priority order.
pub const RATELIMIT_RESET: &[&str] = &["x-ratelimit-reset", "X-RateLimit-Reset"];
/// Candidate spellings for the request quota of the current window.
pub const RATELIMIT_LIMIT: &[&str] = &["x-ratelimit-limit", "X-RateLimit-Limit"];
/// Candidate spellings for the requests left in the current window.
pub const RATELIMIT_REMAINING: &[&str] = &["x-ratelimit-remaining", "X-RateLimit-Remaining"];
/// Candidate spellings for the explicit retry delay sent with 429 responses.
pub const RETRY_AFTER: &[&str] = &["retry-after", "Retry-After"];

/// Raised when a header source cannot be read as a mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("headers must be a mapping, got {found}")]
    NotAMapping { found: &'static str },

    #[error("odd number of arguments for headers ({0} given)")]
    OddNumberOfArguments(usize),

    #[error("header {name} has an unsupported {found} value")]
    InvalidValue { name: String, found: &'static str },
}

/// Immutable snapshot of the headers of one HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers {
    entries: BTreeMap<String, HeaderValue>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds headers from a flat `[name, value, name, value, ...]` list.
    pub fn from_flat<S: Into<String>>(items: Vec<S>) -> Result<Self, HeaderError> {
        if items.len() % 2 != 0 {
            return Err(HeaderError::OddNumberOfArguments(items.len()));
        }

        let mut headers = Headers::new();
        let mut iter = items.into_iter();
        while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
            headers.insert(name, HeaderValue::Text(value.into()));
        }
        Ok(headers)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries.get(name)
    }

    /// Returns the value of the first name in `names` that is present and non-empty.
    pub fn first_present(&self, names: &[&str]) -> Option<&HeaderValue> {
        names
            .iter()
            .filter_map(|name| self.entries.get(*name))
            .find(|value| !value.is_empty())
    }

    /// Like [`Headers::first_present`], parsed as a non-negative integer.
    ///
    /// Missing, empty and unparseable values all come back as `None`.
    pub fn first_u64(&self, names: &[&str]) -> Option<u64> {
        let value = self.first_present(names)?;
        let parsed = value.as_u64();
        if parsed.is_none() {
            debug!("Ignoring non-numeric value {:?} for {:?}", value, names);
        }
        parsed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds every entry of `other`, replacing entries with the same name.
    pub fn extend(&mut self, other: Headers) {
        self.entries.extend(other.entries);
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Headers {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<&reqwest::header::HeaderMap> for Headers {
    fn from(map: &reqwest::header::HeaderMap) -> Self {
        let mut headers = Headers::new();
        for (name, value) in map {
            // Repeated names keep their first value.
            if headers.get(name.as_str()).is_some() {
                continue;
            }
            let value = match value.to_str() {
                Ok(s) => HeaderValue::Text(s.to_string()),
                Err(_) => {
                    debug!("Header {} is not valid UTF-8, keeping it as null", name);
                    HeaderValue::Null
                }
            };
            headers.insert(name.as_str(), value);
        }
        headers
    }
}

impl TryFrom<serde_json::Value> for Headers {
    type Error = HeaderError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(HeaderError::NotAMapping {
                    found: json_type_name(&other),
                });
            }
        };

        let mut headers = Headers::new();
        for (name, value) in object {
            let value = match value {
                Value::Null => HeaderValue::Null,
                Value::String(s) => HeaderValue::Text(s),
                Value::Bool(b) => HeaderValue::Text(b.to_string()),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => HeaderValue::Number(i),
                    None => HeaderValue::Text(n.to_string()),
                },
                other @ (Value::Array(_) | Value::Object(_)) => {
                    return Err(HeaderError::InvalidValue {
                        name,
                        found: json_type_name(&other),
                    });
                }
            };
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl TryFrom<Vec<String>> for Headers {
    type Error = HeaderError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        Headers::from_flat(items)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Anything an [`crate::ApiError`] can take its headers from.
///
/// Sources that are always mappings convert infallibly; loosely typed sources (JSON, flat
/// lists, an optional map) can fail with a [`HeaderError`].
pub trait IntoHeaders {
    fn into_headers(self) -> Result<Headers, HeaderError>;
}

impl IntoHeaders for Headers {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Ok(self)
    }
}

impl IntoHeaders for &reqwest::header::HeaderMap {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Ok(Headers::from(self))
    }
}

impl IntoHeaders for serde_json::Value {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Headers::try_from(self)
    }
}

impl IntoHeaders for Vec<String> {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Headers::from_flat(self)
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> IntoHeaders for Vec<(K, V)> {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Ok(self.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<HeaderValue>, const N: usize> IntoHeaders for [(K, V); N] {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Ok(self.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> IntoHeaders for BTreeMap<K, V> {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Ok(self.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> IntoHeaders for HashMap<K, V> {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        Ok(self.into_iter().collect())
    }
}

impl<T: IntoHeaders> IntoHeaders for Option<T> {
    fn into_headers(self) -> Result<Headers, HeaderError> {
        match self {
            Some(source) => source.into_headers(),
            None => Err(HeaderError::NotAMapping { found: "nothing" }),
        }
    }
}
