//! Error types for body decoding and raw message handling.
//!
//! # Design
//! A `BodyError` never fails a request. It travels with the
//! `InspectedRequest` as data so the renderer can decide whether to surface
//! it (development mode) or drop it silently.

use thiserror::Error;

/// Why a request body could not be shown in decoded form.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body was declared as JSON but did not parse.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server could not read the body, e.g. it exceeded the size limit.
    #[error("request body could not be read: {0}")]
    Unreadable(String),
}

/// Errors from building or parsing a raw HTTP message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Only plain `http://` URLs can be sent over a bare TCP stream.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("message has no start line")]
    MissingStartLine,

    #[error("malformed start line: {0:?}")]
    MalformedStartLine(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_message_carries_position() {
        let err: BodyError = serde_json::from_str::<serde_json::Value>("{bad")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("JSON parse error: "), "{msg}");
        assert!(msg.contains("line 1"), "{msg}");
    }

    #[test]
    fn malformed_header_message_quotes_line() {
        let err = MessageError::MalformedHeader("no colon here".to_string());
        assert_eq!(err.to_string(), "malformed header line: \"no colon here\"");
    }

    #[test]
    fn unreadable_error_message() {
        let err = BodyError::Unreadable("length limit exceeded".to_string());
        assert_eq!(
            err.to_string(),
            "request body could not be read: length limit exceeded"
        );
    }
}
