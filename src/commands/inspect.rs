use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::StatusCode;

use crate::clock::{FixedClock, SystemClock};
use crate::error::{ApiError, ErrorKind, RateLimitSnapshot};
use crate::headers::{Headers, IntoHeaders};

/// Inputs for `api-error inspect`.
#[derive(Debug, Default, Clone)]
pub struct InspectOptions {
    pub status: Option<u16>,
    pub message: Option<String>,
    /// Raw `Name: value` lines.
    pub headers: Vec<String>,
    pub headers_json: Option<String>,
    /// Pins "now" to these Unix seconds.
    pub now: Option<u64>,
    pub json: bool,
}

/// Builds the error described by `options` and prints its derived fields.
#[tracing::instrument(skip(options))]
pub fn inspect(options: InspectOptions) -> Result<()> {
    let output = render(&options)?;
    println!("{}", output);
    Ok(())
}

pub(crate) fn render(options: &InspectOptions) -> Result<String> {
    let error = build_error(options)?;
    let snapshot = match options.now {
        Some(secs) => {
            let Some(clock) = FixedClock::try_from_unix_secs(secs) else {
                bail!("--now {} is out of range", secs);
            };
            error.snapshot_with(&clock)
        }
        None => error.snapshot_with(&SystemClock),
    };

    if options.json {
        return serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot");
    }
    Ok(format_snapshot(&snapshot, error.headers()))
}

fn build_error(options: &InspectOptions) -> Result<ApiError> {
    let mut headers = Headers::new();
    for line in &options.headers {
        let (name, value) = parse_header_line(line)?;
        headers.insert(name, value);
    }

    if let Some(raw) = &options.headers_json {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("Failed to parse --headers-json")?;
        headers.extend(value.into_headers()?);
    }
    debug!("Inspecting {} header(s)", headers.len());

    let kind = match options.status {
        Some(code) => {
            let status = StatusCode::from_u16(code)
                .with_context(|| format!("Invalid HTTP status code: {}", code))?;
            ErrorKind::from_status(status)
        }
        None => ErrorKind::General,
    };

    Ok(ApiError::with_headers(kind, options.message.clone(), headers))
}

fn parse_header_line(line: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = line.split_once(':') else {
        bail!("Invalid header '{}', expected 'Name: value'", line);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid header '{}', name is empty", line);
    }
    Ok((name, value.trim()))
}

fn format_snapshot(snapshot: &RateLimitSnapshot, headers: &Headers) -> String {
    let mut lines = vec![format!("kind: {}", snapshot.kind)];
    if let Some(message) = &snapshot.message {
        lines.push(format!("message: {}", message));
    }
    lines.push(format!("ratelimit-limit: {}", snapshot.limit));
    lines.push(format!("ratelimit-remaining: {}", snapshot.remaining));
    lines.push(format!("ratelimit-reset: {}", snapshot.reset));
    lines.push(format!("retry-after: {}", snapshot.retry_after));
    lines.push(format!("retryable: {}", snapshot.retryable));
    if !headers.is_empty() {
        lines.push("headers:".to_string());
        for (name, value) in headers.iter() {
            lines.push(format!("  {}: {}", name, value));
        }
    }
    lines.join("\n")
}
