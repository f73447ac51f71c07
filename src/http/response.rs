//! Turning failed `reqwest` responses into [`ApiError`]s.

use log::debug;
use reqwest::Response;
use serde::Deserialize;

use crate::error::ApiError;
use crate::headers::Headers;

/// Error body shape most JSON APIs use; either field may carry the human-readable text.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Builds an error from a response, consuming its body for the message.
    #[tracing::instrument(skip(response))]
    pub async fn from_response(response: Response) -> ApiError {
        let status = response.status();
        let headers = Headers::from(response.headers());

        let message = match response.text().await {
            Ok(body) => message_from_body(&body),
            Err(e) => {
                debug!("Failed to read error body for HTTP {}: {}", status, e);
                None
            }
        };

        let error = ApiError::from_status(status, message, headers);
        debug!(
            "HTTP {} mapped to {:?} (retry after {}s)",
            status.as_u16(),
            error.kind(),
            error.retry_after()
        );
        error
    }
}

/// Passes successful responses through and turns 4xx/5xx responses into an [`ApiError`].
pub async fn error_for_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(ApiError::from_response(response).await);
    }
    Ok(response)
}

fn message_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .or_else(|| Some(body.to_string()))
}
