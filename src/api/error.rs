//! Errors raised while talking to the rent tracking server

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS and the like.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The body could not be decoded into the expected type.
    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http {
            status,
            message: server_message(&body),
        }
    }
}

/// The server reports failures as `{"error": "..."}`; fall back to the raw body.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_prefers_error_field() {
        assert_eq!(
            server_message(r#"{"error": "Failed to create property"}"#),
            "Failed to create property"
        );
        assert_eq!(server_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_http_error_display() {
        let err = ApiError::Http {
            status: 500,
            message: "Failed to fetch properties".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error with status 500: Failed to fetch properties"
        );
    }
}
